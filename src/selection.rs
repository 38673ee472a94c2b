//! Region selection state.
//!
//! [`SelectionSet`] tracks two independent sets of region ids:
//! - the confirmed selection, changed by clicks, hotkeys and bulk actions
//! - the drawing selection, filled while an area-selection gesture is in
//!   progress and either promoted or discarded when the gesture ends
//!
//! Membership is by id only. Regions stay owned by the
//! [`RegionCollection`], which every mutating call receives so the
//! per-region flags and lifecycle hooks can be updated.

use std::collections::HashSet;

use crate::collection::RegionCollection;
use crate::model::RegionId;
use crate::schedule::TaskQueue;

// ============================================================================
// Hook Capabilities
// ============================================================================

/// Context passed to selection hooks.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// The region the hook runs for
    pub region: &'a RegionId,
    /// Number of selected regions at the time the hook runs
    pub selected_count: usize,
}

impl HookContext<'_> {
    pub fn has_selection(&self) -> bool {
        self.selected_count > 0
    }
}

/// Regions with editable per-region controls implement this to commit
/// uncommitted input before they lose their highlight.
pub trait FlushOnDeselect {
    fn flush_before_unselect(&mut self, ctx: &HookContext<'_>);
}

/// Optional selection lifecycle callbacks of a region.
pub trait SelectionHooks {
    fn after_selected(&mut self, _ctx: &HookContext<'_>) {}

    fn after_unselect(&mut self, _ctx: &HookContext<'_>) {}
}

// ============================================================================
// Selection Set
// ============================================================================

/// Work deferred to the next tick by selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTask {
    /// Recompute merged control values from the selected regions
    MergeResults,
}

/// Selected and drawing-selected region ids.
#[derive(Debug, Default)]
pub struct SelectionSet {
    selected: HashSet<RegionId>,
    drawing: HashSet<RegionId>,
    pending: TaskQueue<SelectionTask>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_selected(&self, id: &RegionId) -> bool {
        self.selected.contains(id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The sole selected region, if exactly one is selected.
    pub fn highlighted(&self) -> Option<&RegionId> {
        if self.selected.len() == 1 {
            self.selected.iter().next()
        } else {
            None
        }
    }

    /// Selected ids in collection order.
    pub fn selected_ids(&self, regions: &RegionCollection) -> Vec<RegionId> {
        ordered(&self.selected, regions)
    }

    /// Drawing-selected ids in collection order.
    pub fn drawing_ids(&self, regions: &RegionCollection) -> Vec<RegionId> {
        ordered(&self.drawing, regions)
    }

    pub fn is_drawing_selected(&self, id: &RegionId) -> bool {
        self.drawing.contains(id)
    }

    // ========================================================================
    // Confirmed Selection
    // ========================================================================

    /// Add a region to the selection.
    ///
    /// Hidden or unknown regions are ignored. When the selection grows
    /// from one region to several, the previously highlighted region runs
    /// its unselect hooks first so it can flush edits bound to it.
    pub fn select(&mut self, regions: &mut RegionCollection, id: &RegionId) {
        match regions.get(id) {
            None => {
                log::debug!("Ignoring select of unknown region {}", id);
                return;
            }
            Some(region) if region.is_hidden() => {
                log::debug!("Ignoring select of hidden region {}", id);
                return;
            }
            Some(_) => {}
        }
        if self.selected.contains(id) {
            return;
        }

        if let Some(previous) = self.highlighted().cloned()
            && let Some(region) = regions.get_mut(&previous)
        {
            region.notify_before_unselect(1);
            region.notify_after_unselect(1);
        }

        self.selected.insert(id.clone());
        let count = self.selected.len();
        if let Some(region) = regions.get_mut(id) {
            region.set_selected(true);
            region.notify_after_selected(count);
        }
        self.pending.schedule(SelectionTask::MergeResults);
    }

    /// Remove a region from the selection.
    pub fn unselect(&mut self, regions: &mut RegionCollection, id: &RegionId) {
        if !self.selected.contains(id) {
            return;
        }

        if let Some(region) = regions.get_mut(id) {
            region.notify_before_unselect(self.selected.len());
        }
        self.selected.remove(id);
        let count = self.selected.len();
        if let Some(region) = regions.get_mut(id) {
            region.set_selected(false);
            region.notify_after_unselect(count);
        }
        self.pending.schedule(SelectionTask::MergeResults);
    }

    /// Unselect everything.
    ///
    /// All `before_unselect` hooks run while the selection is still
    /// intact, then the set is emptied, then all `after_unselect` hooks run.
    pub fn clear(&mut self, regions: &mut RegionCollection) {
        if self.selected.is_empty() {
            return;
        }

        let members = self.selected_ids(regions);
        let count = self.selected.len();
        for id in &members {
            if let Some(region) = regions.get_mut(id) {
                region.notify_before_unselect(count);
            }
        }

        self.selected.clear();

        for id in &members {
            if let Some(region) = regions.get_mut(id) {
                region.set_selected(false);
                region.notify_after_unselect(0);
            }
        }
        self.pending.schedule(SelectionTask::MergeResults);
    }

    /// Make a region the only selected one.
    pub fn highlight(&mut self, regions: &mut RegionCollection, id: &RegionId) {
        self.clear(regions);
        self.select(regions, id);
    }

    /// Toggle membership, or force it with `Some(selected)`.
    pub fn toggle(&mut self, regions: &mut RegionCollection, id: &RegionId, selected: Option<bool>) {
        let select = selected.unwrap_or_else(|| !self.selected.contains(id));
        if select {
            self.select(regions, id);
        } else {
            self.unselect(regions, id);
        }
    }

    /// Drop a region that is being deleted from both sets without hooks.
    pub fn evict(&mut self, id: &RegionId) {
        self.drawing.remove(id);
        if self.selected.remove(id) {
            self.pending.schedule(SelectionTask::MergeResults);
        }
    }

    // ========================================================================
    // Drawing Selection
    // ========================================================================

    /// Mark a region as covered by the in-progress area selection.
    pub fn drawing_select(&mut self, regions: &mut RegionCollection, id: &RegionId) {
        let Some(region) = regions.get_mut(id) else {
            return;
        };
        if region.is_hidden() {
            return;
        }
        region.set_drawing_selected(true);
        self.drawing.insert(id.clone());
    }

    /// Discard the drawing selection. The confirmed selection is untouched.
    pub fn drawing_unselect(&mut self, regions: &mut RegionCollection) {
        for id in self.drawing.drain() {
            if let Some(region) = regions.get_mut(&id) {
                region.set_drawing_selected(false);
            }
        }
    }

    /// End the area-selection gesture, adding every covered region to the
    /// confirmed selection.
    pub fn finish_drawing(&mut self, regions: &mut RegionCollection) {
        let covered = self.drawing_ids(regions);
        self.drawing_unselect(regions);
        for id in &covered {
            self.select(regions, id);
        }
    }

    // ========================================================================
    // Deferred Work
    // ========================================================================

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the tasks scheduled since the last tick.
    pub fn take_pending(&mut self) -> Vec<SelectionTask> {
        self.pending.drain()
    }
}

fn ordered(ids: &HashSet<RegionId>, regions: &RegionCollection) -> Vec<RegionId> {
    let mut ids: Vec<RegionId> = ids.iter().cloned().collect();
    ids.sort_by_key(|id| regions.position(id).unwrap_or(usize::MAX));
    ids
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::{Region, RegionType};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder(Log);

    impl FlushOnDeselect for Recorder {
        fn flush_before_unselect(&mut self, ctx: &HookContext<'_>) {
            self.0
                .borrow_mut()
                .push(format!("flush {} {}", ctx.region, ctx.selected_count));
        }
    }

    impl SelectionHooks for Recorder {
        fn after_selected(&mut self, ctx: &HookContext<'_>) {
            self.0.borrow_mut().push(format!("selected {}", ctx.region));
        }

        fn after_unselect(&mut self, ctx: &HookContext<'_>) {
            self.0
                .borrow_mut()
                .push(format!("unselected {} {}", ctx.region, ctx.has_selection()));
        }
    }

    fn collection(log: &Log, ids: &[&str]) -> RegionCollection {
        let mut regions = RegionCollection::new();
        for id in ids {
            let region = Region::new(*id, RegionType::Rectangle)
                .with_flush_hook(Recorder(Rc::clone(log)))
                .with_selection_hooks(Recorder(Rc::clone(log)));
            regions.add(region).expect("add region");
        }
        regions
    }

    fn id(s: &str) -> RegionId {
        RegionId::new(s)
    }

    #[test]
    fn test_select_and_unselect() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b"]);
        let mut selection = SelectionSet::new();

        selection.select(&mut regions, &id("a"));
        assert!(selection.is_selected(&id("a")));
        assert_eq!(selection.highlighted(), Some(&id("a")));
        assert!(regions.get(&id("a")).is_some_and(Region::is_selected));

        selection.unselect(&mut regions, &id("a"));
        assert!(!selection.has_selection());
        assert!(!regions.get(&id("a")).is_some_and(Region::is_selected));
        assert_eq!(
            *log.borrow(),
            vec!["selected a", "flush a 1", "unselected a false"]
        );
    }

    #[test]
    fn test_hidden_region_cannot_be_selected() {
        let mut regions = RegionCollection::new();
        regions
            .add(Region::new("h", RegionType::Polygon).with_hidden(true))
            .expect("add");
        let mut selection = SelectionSet::new();

        selection.select(&mut regions, &id("h"));
        assert!(!selection.has_selection());
        assert!(!selection.has_pending());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut regions = RegionCollection::new();
        let mut selection = SelectionSet::new();
        selection.select(&mut regions, &id("missing"));
        selection.unselect(&mut regions, &id("missing"));
        assert!(!selection.has_selection());
    }

    #[test]
    fn test_second_selection_flushes_previous_highlight() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b"]);
        let mut selection = SelectionSet::new();

        selection.select(&mut regions, &id("a"));
        log.borrow_mut().clear();
        selection.select(&mut regions, &id("b"));

        assert_eq!(
            *log.borrow(),
            vec!["flush a 1", "unselected a true", "selected b"]
        );
        assert!(selection.is_selected(&id("a")));
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.highlighted(), None);
    }

    #[test]
    fn test_clear_runs_hooks_in_two_phases() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b", "c"]);
        let mut selection = SelectionSet::new();
        for s in ["a", "b", "c"] {
            selection.select(&mut regions, &id(s));
        }
        log.borrow_mut().clear();

        selection.clear(&mut regions);

        assert_eq!(selection.len(), 0);
        assert_eq!(
            *log.borrow(),
            vec![
                "flush a 3",
                "flush b 3",
                "flush c 3",
                "unselected a false",
                "unselected b false",
                "unselected c false",
            ]
        );
    }

    #[test]
    fn test_highlight_replaces_selection() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b", "c"]);
        let mut selection = SelectionSet::new();
        selection.select(&mut regions, &id("a"));
        selection.select(&mut regions, &id("b"));

        selection.highlight(&mut regions, &id("c"));
        assert_eq!(selection.selected_ids(&regions), vec![id("c")]);
    }

    #[test]
    fn test_toggle() {
        let log = Log::default();
        let mut regions = collection(&log, &["a"]);
        let mut selection = SelectionSet::new();

        selection.toggle(&mut regions, &id("a"), None);
        assert!(selection.is_selected(&id("a")));
        selection.toggle(&mut regions, &id("a"), Some(true));
        assert!(selection.is_selected(&id("a")));
        selection.toggle(&mut regions, &id("a"), None);
        assert!(!selection.is_selected(&id("a")));
    }

    #[test]
    fn test_many_selects_schedule_one_merge() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b", "c", "d"]);
        let mut selection = SelectionSet::new();
        for s in ["a", "b", "c", "d"] {
            selection.select(&mut regions, &id(s));
        }
        assert_eq!(selection.take_pending(), vec![SelectionTask::MergeResults]);
        assert!(!selection.has_pending());
    }

    #[test]
    fn test_drawing_selection_cancel_and_finish() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b", "c"]);
        let mut selection = SelectionSet::new();
        selection.select(&mut regions, &id("c"));
        let _ = selection.take_pending();

        selection.drawing_select(&mut regions, &id("a"));
        selection.drawing_select(&mut regions, &id("b"));
        assert!(!selection.has_pending());
        assert!(regions.get(&id("a")).is_some_and(Region::is_drawing_selected));

        selection.drawing_unselect(&mut regions);
        assert!(selection.drawing_ids(&regions).is_empty());
        assert_eq!(selection.selected_ids(&regions), vec![id("c")]);

        selection.drawing_select(&mut regions, &id("a"));
        selection.finish_drawing(&mut regions);
        assert_eq!(selection.selected_ids(&regions), vec![id("a"), id("c")]);
        assert!(!regions.get(&id("a")).is_some_and(Region::is_drawing_selected));
    }

    #[test]
    fn test_evict_removes_from_both_sets() {
        let log = Log::default();
        let mut regions = collection(&log, &["a", "b"]);
        let mut selection = SelectionSet::new();
        selection.select(&mut regions, &id("a"));
        selection.drawing_select(&mut regions, &id("a"));

        selection.evict(&id("a"));
        assert!(!selection.is_selected(&id("a")));
        assert!(!selection.is_drawing_selected(&id("a")));
    }
}
