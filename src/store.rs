//! Region store.
//!
//! [`RegionStore`] owns the regions of one annotation together with their
//! selection, filter, outliner settings and quick-select hotkeys, and
//! keeps them consistent:
//! - deleting a region re-parents its children and evicts it from the
//!   selection and the filter in the same call
//! - hiding a selected region unselects it
//! - every change to the sorted, visible list rebinds the hotkeys
//! - merged control values are recomputed once per [`tick`](RegionStore::tick)

use crate::click::{ClickOutcome, Modifiers};
use crate::collection::{CollectionEvent, RegionCollection};
use crate::config::StoreConfig;
use crate::controls::ControlRegistry;
use crate::error::StoreError;
use crate::filter::RegionFilter;
use crate::hotkeys::HotkeyBinder;
use crate::model::{LabelDescriptor, Region, RegionId, RegionType};
use crate::outliner::{GroupingMode, OutlinerSettings, SortKey, ViewMode};
use crate::preferences::Preferences;
use crate::selection::{SelectionSet, SelectionTask};
use crate::tree::{RegionTree, TreeItem, TreeOptions};

/// Regions of one annotation and everything derived from them.
#[derive(Debug)]
pub struct RegionStore {
    regions: RegionCollection,
    selection: SelectionSet,
    controls: ControlRegistry,
    filter: RegionFilter,
    outliner: OutlinerSettings,
    hotkeys: HotkeyBinder,
    tree_options: TreeOptions,
}

impl RegionStore {
    /// Create an empty store.
    ///
    /// `task_view` is the task's own display preference, used when no
    /// view mode has been stored yet.
    pub fn new(prefs: Box<dyn Preferences>, config: &StoreConfig, task_view: Option<ViewMode>) -> Self {
        Self {
            regions: RegionCollection::new(),
            selection: SelectionSet::new(),
            controls: ControlRegistry::new(),
            filter: RegionFilter::new(),
            outliner: OutlinerSettings::load(prefs, config.outliner_defaults(task_view)),
            hotkeys: HotkeyBinder::new(config.hotkey_prefix.clone()),
            tree_options: config.tree_options(),
        }
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Add a region.
    pub fn add(&mut self, region: Region) -> Result<(), StoreError> {
        let event = self.regions.add(region)?;
        self.on_membership_change(&event);
        Ok(())
    }

    /// Add several regions, rebinding hotkeys once at the end.
    ///
    /// Stops at the first duplicate id; regions added before it are kept.
    pub fn extend<I>(&mut self, regions: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Region>,
    {
        let mut result = Ok(());
        let mut added = 0usize;
        for region in regions {
            if let Err(e) = self.regions.add(region) {
                result = Err(e);
                break;
            }
            added += 1;
        }
        log::debug!("Added {} regions in one batch", added);
        self.rebind_hotkeys();
        result
    }

    /// Delete a region.
    ///
    /// Children are re-parented to the deleted region's parent and the id
    /// is evicted from the selection and the filter before this returns.
    /// Unknown ids are ignored.
    pub fn remove(&mut self, id: &RegionId) -> Option<Region> {
        let removed = self.regions.remove(id)?;
        self.selection.evict(id);
        self.filter.forget(id);
        self.on_membership_change(&CollectionEvent::Deleted(id.clone()));
        Some(removed)
    }

    /// Register a listener for created/deleted events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&CollectionEvent) + 'static,
    {
        self.regions.subscribe(listener);
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn regions(&self) -> &RegionCollection {
        &self.regions
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlRegistry {
        &mut self.controls
    }

    pub fn outliner(&self) -> &OutlinerSettings {
        &self.outliner
    }

    pub fn hotkeys(&self) -> &HotkeyBinder {
        &self.hotkeys
    }

    pub fn filter(&self) -> &RegionFilter {
        &self.filter
    }

    /// Non-classification regions in the current sort order, hidden ones included.
    pub fn sorted_regions(&self) -> Vec<&Region> {
        sorted(&self.regions, &self.outliner)
    }

    /// Sorted regions that are not hidden.
    pub fn visible_regions(&self) -> Vec<&Region> {
        visible(&self.regions, &self.outliner)
    }

    // ========================================================================
    // Tree
    // ========================================================================

    /// Build the region tree with the persisted grouping mode.
    pub fn regions_tree<D, F>(&self, enrich: F) -> RegionTree<D>
    where
        F: FnMut(TreeItem<'_>, usize, bool) -> D,
    {
        self.regions_tree_with(self.outliner.grouping(), enrich)
    }

    /// Build the region tree with an explicit grouping mode.
    pub fn regions_tree_with<D, F>(&self, mode: GroupingMode, enrich: F) -> RegionTree<D>
    where
        F: FnMut(TreeItem<'_>, usize, bool) -> D,
    {
        RegionTree::build(mode, &self.sorted_regions(), self.tree_options, enrich)
    }

    /// Route a click on a tree item to the selection.
    pub fn click<D>(&mut self, tree: &mut RegionTree<D>, id: &RegionId, modifiers: Modifiers) {
        let selection = &self.selection;
        let outcome = tree.route_click(id, modifiers, selection.highlighted(), |r| {
            selection.is_selected(r)
        });
        match outcome {
            ClickOutcome::Range { select, unselect } => {
                for id in &unselect {
                    self.selection.unselect(&mut self.regions, id);
                }
                for id in &select {
                    self.selection.select(&mut self.regions, id);
                }
            }
            ClickOutcome::Toggle(id) => self.selection.toggle(&mut self.regions, &id, None),
            ClickOutcome::Clear => self.selection.clear(&mut self.regions),
            ClickOutcome::Highlight(id) => self.selection.highlight(&mut self.regions, &id),
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn select(&mut self, id: &RegionId) {
        self.selection.select(&mut self.regions, id);
    }

    pub fn unselect(&mut self, id: &RegionId) {
        self.selection.unselect(&mut self.regions, id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.regions);
    }

    pub fn highlight(&mut self, id: &RegionId) {
        self.selection.highlight(&mut self.regions, id);
    }

    /// Toggle membership, or force it with `Some(selected)`.
    pub fn toggle_selection(&mut self, id: &RegionId, selected: Option<bool>) {
        self.selection.toggle(&mut self.regions, id, selected);
    }

    pub fn drawing_select(&mut self, id: &RegionId) {
        self.selection.drawing_select(&mut self.regions, id);
    }

    /// Cancel an area-selection gesture.
    pub fn drawing_unselect(&mut self) {
        self.selection.drawing_unselect(&mut self.regions);
    }

    /// Complete an area-selection gesture.
    pub fn finish_drawing(&mut self) {
        self.selection.finish_drawing(&mut self.regions);
    }

    /// Move the single selection to the next visible region, wrapping.
    pub fn select_next(&mut self) {
        let next = {
            let visible = self.visible_regions();
            let current = visible.iter().position(|r| self.selection.is_selected(r.id()));
            let next = match current {
                Some(i) => visible.get(i + 1).or_else(|| visible.first()),
                None => visible.first(),
            };
            next.map(|r| r.id().clone())
        };
        if let Some(id) = next {
            self.highlight(&id);
        }
    }

    /// Highlight the region bound to a quick-select slot.
    pub fn quick_select(&mut self, slot: usize) {
        if let Some(id) = self.hotkeys.region_for_slot(slot).cloned() {
            self.highlight(&id);
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn is_selected(&self, id: &RegionId) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected ids in collection order.
    pub fn selected_ids(&self) -> Vec<RegionId> {
        self.selection.selected_ids(&self.regions)
    }

    pub fn highlighted(&self) -> Option<&RegionId> {
        self.selection.highlighted()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Run work deferred by the current gesture.
    ///
    /// Returns whether anything ran.
    pub fn tick(&mut self) -> bool {
        let tasks = self.selection.take_pending();
        for task in &tasks {
            match task {
                SelectionTask::MergeResults => {
                    let ids = self.selection.selected_ids(&self.regions);
                    let selected = ids.iter().filter_map(|id| self.regions.get(id));
                    self.controls.apply_selection(selected);
                }
            }
        }
        !tasks.is_empty()
    }

    // ========================================================================
    // Sorting, Grouping and Filtering
    // ========================================================================

    pub fn set_sort(&mut self, key: SortKey) {
        self.outliner.set_sort(key);
        self.rebind_hotkeys();
    }

    pub fn set_grouping(&mut self, mode: GroupingMode) {
        self.outliner.set_grouping(mode);
    }

    /// Set the grouping from an untrusted string, e.g. a stored value.
    pub fn set_grouping_str(&mut self, mode: &str) {
        self.outliner.set_grouping_str(mode);
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.outliner.set_view(view);
    }

    /// Show only the given regions, or everything with `None`.
    pub fn set_filtered_regions(&mut self, filter: Option<&[RegionId]>) {
        let hidden = self.filter.apply(&mut self.regions, filter);
        self.after_hiding(&hidden);
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Show every user-hidden region, or hide all if none is hidden.
    pub fn toggle_visibility(&mut self) {
        let any_hidden = self.regions.iter().any(Region::is_user_hidden);
        let mut hidden = Vec::new();
        for region in self.regions.iter_mut().filter(|r| r.is_hideable()) {
            if any_hidden {
                region.set_user_hidden(false);
            } else if !region.is_user_hidden() {
                region.set_user_hidden(true);
                hidden.push(region.id().clone());
            }
        }
        self.after_hiding(&hidden);
    }

    /// Hide or show one region.
    pub fn set_region_hidden(&mut self, id: &RegionId, hidden: bool) {
        let Some(region) = self.regions.get_mut(id) else {
            return;
        };
        if !region.is_hideable() || region.is_user_hidden() == hidden {
            return;
        }
        region.set_user_hidden(hidden);
        let newly = if hidden { vec![id.clone()] } else { Vec::new() };
        self.after_hiding(&newly);
    }

    /// Hide or show every region made with one tool.
    pub fn set_hidden_by_tool(&mut self, hidden: bool, tool: RegionType) {
        self.set_hidden_where(hidden, |r| r.region_type() == tool);
    }

    /// Hide or show every region carrying a label.
    pub fn set_hidden_by_label(&mut self, hidden: bool, label: &LabelDescriptor) {
        self.set_hidden_where(hidden, |r| r.has_label(label));
    }

    fn set_hidden_where<P>(&mut self, hidden: bool, matches: P)
    where
        P: Fn(&Region) -> bool,
    {
        let mut newly = Vec::new();
        for region in self.regions.iter_mut() {
            if !region.is_hideable() || region.is_user_hidden() == hidden || !matches(region) {
                continue;
            }
            region.set_user_hidden(hidden);
            if hidden {
                newly.push(region.id().clone());
            }
        }
        self.after_hiding(&newly);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Keep the selection inside the visible regions and refresh hotkeys.
    fn after_hiding(&mut self, hidden: &[RegionId]) {
        for id in hidden {
            self.selection.unselect(&mut self.regions, id);
        }
        self.rebind_hotkeys();
    }

    fn on_membership_change(&mut self, event: &CollectionEvent) {
        let list = visible(&self.regions, &self.outliner);
        self.hotkeys.on_collection_event(event, &list);
    }

    fn rebind_hotkeys(&mut self) {
        let list = visible(&self.regions, &self.outliner);
        self.hotkeys.rebind(&list);
    }
}

fn sorted<'a>(regions: &'a RegionCollection, outliner: &OutlinerSettings) -> Vec<&'a Region> {
    let mut list: Vec<&Region> = regions.iter().filter(|r| !r.classification).collect();
    outliner.sort_regions(&mut list);
    list
}

fn visible<'a>(regions: &'a RegionCollection, outliner: &OutlinerSettings) -> Vec<&'a Region> {
    let mut list = sorted(regions, outliner);
    list.retain(|r| !r.is_hidden());
    list
}
