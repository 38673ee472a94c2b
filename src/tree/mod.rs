//! Region tree construction.
//!
//! Turns the sorted list of regions into a forest of [`GroupNode`]s using
//! one of three strategies:
//! - manual: parent/child links from `parent_id`
//! - by label: one group per attached label
//! - by type: one group per region type
//!
//! The caller decorates every node through an `enrich` callback with the
//! signature `(item, index, is_group_header) -> D`, which keeps rendering
//! concerns out of this module. For area nodes `index` is the position
//! of the region in the input list, for group headers the position of
//! the group.

mod labels;
mod manual;
mod node;
mod types;

pub use node::{GroupNode, Preorder, TreeItem};

use crate::click::{ClickOutcome, ClickRouter, Modifiers};
use crate::model::{Region, RegionId};
use crate::outliner::GroupingMode;

/// Options for tree construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Order label groups by their hotkey
    pub sort_label_groups_by_hotkey: bool,
}

/// A displayed region tree together with its click-routing state.
#[derive(Debug, Clone)]
pub struct RegionTree<D> {
    mode: GroupingMode,
    roots: Vec<GroupNode<D>>,
    router: ClickRouter,
}

impl<D> RegionTree<D> {
    /// Build a tree from regions that are already filtered and sorted.
    pub fn build<F>(mode: GroupingMode, regions: &[&Region], options: TreeOptions, mut enrich: F) -> Self
    where
        F: FnMut(TreeItem<'_>, usize, bool) -> D,
    {
        let roots = match mode {
            GroupingMode::Manual => manual::build(regions, &mut enrich),
            GroupingMode::Label => {
                labels::build(regions, options.sort_label_groups_by_hotkey, &mut enrich)
            }
            GroupingMode::Type => types::build(regions, &mut enrich),
        };
        Self {
            mode,
            roots,
            router: ClickRouter::new(),
        }
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    pub fn roots(&self) -> &[GroupNode<D>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn router(&self) -> &ClickRouter {
        &self.router
    }

    /// Route a click on a displayed region.
    pub(crate) fn route_click<S>(
        &mut self,
        target: &RegionId,
        modifiers: Modifiers,
        highlighted: Option<&RegionId>,
        is_selected: S,
    ) -> ClickOutcome
    where
        S: Fn(&RegionId) -> bool,
    {
        self.router
            .route(&self.roots, target, modifiers, highlighted, is_selected)
    }

    /// All nodes in depth-first, pre-order.
    pub fn iter(&self) -> Preorder<'_, D> {
        Preorder::new(&self.roots)
    }

    /// Region ids of all area nodes in depth-first order.
    ///
    /// Regions listed under several label groups appear once per group.
    pub fn flatten(&self) -> Vec<RegionId> {
        self.iter().filter_map(|node| node.region.clone()).collect()
    }

    /// Find the node showing a region (first match in depth-first order).
    pub fn find(&self, id: &RegionId) -> Option<&GroupNode<D>> {
        self.iter().find(|node| node.region.as_ref() == Some(id))
    }
}
