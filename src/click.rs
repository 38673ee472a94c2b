//! Click routing for the region tree.
//!
//! Interprets a click on a tree item the way file managers do:
//! 1. shift: select the displayed range between the anchor and the item
//! 2. ctrl/meta: toggle the item
//! 3. click on the sole highlighted item: clear the selection
//! 4. otherwise: highlight the item and make it the anchor
//!
//! The router only decides what should happen; the
//! [`RegionStore`](crate::store::RegionStore) applies the outcome to the
//! selection. Anchor state lives here and never in the selection set.

use std::collections::HashSet;

use crate::model::RegionId;
use crate::tree::{GroupNode, Preorder};

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a click should do to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Add `select` to the selection and drop `unselect`, the regions the
    /// previous range from the same origin added that the new one no longer covers
    Range {
        select: Vec<RegionId>,
        unselect: Vec<RegionId>,
    },
    /// Flip membership of one region
    Toggle(RegionId),
    /// Clear the selection
    Clear,
    /// Select only this region
    Highlight(RegionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RangeState {
    origin: RegionId,
    /// Regions this range added that were not selected before it
    added: Vec<RegionId>,
}

/// Anchor and range state of one displayed tree.
#[derive(Debug, Clone, Default)]
pub struct ClickRouter {
    last_clicked: Option<RegionId>,
    range: Option<RangeState>,
}

impl ClickRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The anchor for the next shift-click, reset after every range.
    pub fn last_clicked(&self) -> Option<&RegionId> {
        self.last_clicked.as_ref()
    }

    /// Decide the outcome of a click on `target`.
    ///
    /// `highlighted` is the currently sole selected region, if any, and
    /// `is_selected` reports current selection membership.
    pub fn route<D, S>(
        &mut self,
        roots: &[GroupNode<D>],
        target: &RegionId,
        modifiers: Modifiers,
        highlighted: Option<&RegionId>,
        is_selected: S,
    ) -> ClickOutcome
    where
        S: Fn(&RegionId) -> bool,
    {
        if modifiers.shift
            && let Some(outcome) = self.route_range(roots, target, is_selected)
        {
            return outcome;
        }

        if modifiers.toggles() {
            return ClickOutcome::Toggle(target.clone());
        }

        self.range = None;
        if highlighted == Some(target) {
            return ClickOutcome::Clear;
        }

        self.last_clicked = Some(target.clone());
        ClickOutcome::Highlight(target.clone())
    }

    fn route_range<D, S>(&mut self, roots: &[GroupNode<D>], target: &RegionId, is_selected: S) -> Option<ClickOutcome>
    where
        S: Fn(&RegionId) -> bool,
    {
        // A shift-click right after a range continues from that range's origin
        let origin = self
            .last_clicked
            .clone()
            .or_else(|| self.range.as_ref().map(|r| r.origin.clone()))?;

        let Some(path) = area_path(roots, &origin, target) else {
            log::debug!("Range anchor {} is not in the displayed tree", origin);
            self.last_clicked = None;
            self.range = None;
            return None;
        };

        let previous = match self.range.take() {
            Some(previous) if previous.origin == origin => previous.added,
            _ => Vec::new(),
        };
        let (mut added, unselect): (Vec<RegionId>, Vec<RegionId>) =
            previous.into_iter().partition(|id| path.contains(id));
        let fresh: Vec<RegionId> = path
            .iter()
            .filter(|id| !is_selected(*id) && !added.contains(*id))
            .cloned()
            .collect();
        added.extend(fresh);

        self.last_clicked = None;
        self.range = Some(RangeState { origin, added });
        Some(ClickOutcome::Range {
            select: path,
            unselect,
        })
    }
}

/// Area nodes between two regions (inclusive) in depth-first order.
///
/// Traversal stops as soon as both endpoints have been seen. Returns
/// `None` if either endpoint is not in the tree. Regions shown more than
/// once are listed once.
pub fn area_path<D>(roots: &[GroupNode<D>], from: &RegionId, to: &RegionId) -> Option<Vec<RegionId>> {
    let mut walk = PathWalk {
        from,
        to,
        found_from: false,
        found_to: false,
        seen: HashSet::new(),
        path: Vec::new(),
    };
    walk.visit(roots);
    walk.complete().then_some(walk.path)
}

struct PathWalk<'a> {
    from: &'a RegionId,
    to: &'a RegionId,
    found_from: bool,
    found_to: bool,
    seen: HashSet<RegionId>,
    path: Vec<RegionId>,
}

impl PathWalk<'_> {
    fn complete(&self) -> bool {
        self.found_from && self.found_to
    }

    fn inside(&self) -> bool {
        self.found_from != self.found_to
    }

    fn visit<D>(&mut self, roots: &[GroupNode<D>]) {
        for node in Preorder::new(roots) {
            let Some(id) = &node.region else {
                continue;
            };
            let endpoint = id == self.from || id == self.to;
            self.found_from |= id == self.from;
            self.found_to |= id == self.to;
            if (endpoint || self.inside()) && self.seen.insert(id.clone()) {
                self.path.push(id.clone());
            }
            if self.complete() {
                return;
            }
        }
    }
}
