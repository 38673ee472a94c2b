//! Numbered quick-select hotkeys for regions.
//!
//! Slot `N` selects the `N`th visible region in the current sort order.
//! Bindings follow positions, not region ids: whenever the sorted list
//! changes, every binding is dropped and rebuilt from scratch.

use crate::collection::CollectionEvent;
use crate::constants::DEFAULT_HOTKEY_PREFIX;
use crate::model::{Region, RegionId};

/// Number of slots that get a digit key (1-9, then 0).
pub const MAX_DIGIT_SLOTS: usize = 10;

const DIGIT_KEYS: [&str; MAX_DIGIT_SLOTS] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// One quick-select binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickSelectBinding {
    /// 1-based slot number
    pub slot: usize,
    /// Named action, `"<prefix>:<slot>"`
    pub action: String,
    /// Default digit key, only for the first ten slots
    pub key: Option<&'static str>,
    /// The region selected by this binding
    pub region: RegionId,
}

/// Keeps the quick-select bindings in step with the sorted region list.
#[derive(Debug, Clone)]
pub struct HotkeyBinder {
    prefix: String,
    bindings: Vec<QuickSelectBinding>,
    /// Number of times the bindings were rebuilt.
    generation: u64,
}

impl Default for HotkeyBinder {
    fn default() -> Self {
        Self::new(DEFAULT_HOTKEY_PREFIX)
    }
}

impl HotkeyBinder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            bindings: Vec::new(),
            generation: 0,
        }
    }

    /// React to a membership change of the collection.
    pub fn on_collection_event(&mut self, event: &CollectionEvent, visible: &[&Region]) {
        log::debug!("Rebinding quick-select hotkeys after change to {}", event.region());
        self.rebind(visible);
    }

    /// Drop all bindings and bind one slot per visible region.
    pub fn rebind(&mut self, visible: &[&Region]) {
        self.unbind_all();
        self.bindings = visible
            .iter()
            .enumerate()
            .map(|(i, region)| QuickSelectBinding {
                slot: i + 1,
                action: format!("{}:{}", self.prefix, i + 1),
                key: DIGIT_KEYS.get(i).copied(),
                region: region.id().clone(),
            })
            .collect();
        self.generation += 1;
    }

    pub fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    pub fn bindings(&self) -> &[QuickSelectBinding] {
        &self.bindings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Region bound to a slot, if any.
    pub fn region_for_slot(&self, slot: usize) -> Option<&RegionId> {
        slot.checked_sub(1)
            .and_then(|i| self.bindings.get(i))
            .map(|b| &b.region)
    }

    /// Region bound to a named action, if any.
    pub fn region_for_action(&self, action: &str) -> Option<&RegionId> {
        self.bindings
            .iter()
            .find(|b| b.action == action)
            .map(|b| &b.region)
    }

    /// Slot currently bound to a region.
    pub fn slot_for_region(&self, id: &RegionId) -> Option<usize> {
        self.bindings.iter().find(|b| &b.region == id).map(|b| b.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegionType;

    fn regions(n: usize) -> Vec<Region> {
        (1..=n)
            .map(|i| Region::new(format!("R{i}"), RegionType::Polygon))
            .collect()
    }

    #[test]
    fn test_rebind_numbers_by_position() {
        let list = regions(12);
        let refs: Vec<&Region> = list.iter().collect();
        let mut binder = HotkeyBinder::default();
        binder.rebind(&refs);

        assert_eq!(binder.bindings().len(), 12);
        assert_eq!(binder.region_for_slot(1), Some(&RegionId::new("R1")));
        assert_eq!(binder.bindings()[9].key, Some("0"));
        assert_eq!(binder.bindings()[10].key, None);
        assert_eq!(
            binder.region_for_action("region:select:12"),
            Some(&RegionId::new("R12"))
        );
        assert_eq!(binder.region_for_slot(0), None);
        assert_eq!(binder.region_for_slot(13), None);
    }

    #[test]
    fn test_membership_change_rebuilds_from_scratch() {
        let list = regions(3);
        let mut binder = HotkeyBinder::new("quick");
        let refs: Vec<&Region> = list.iter().collect();
        binder.rebind(&refs);
        assert_eq!(binder.slot_for_region(&RegionId::new("R3")), Some(3));

        // R1 deleted: R3 moves to slot 2
        let remaining: Vec<&Region> = list.iter().skip(1).collect();
        binder.on_collection_event(&CollectionEvent::Deleted(RegionId::new("R1")), &remaining);

        assert_eq!(binder.bindings().len(), 2);
        assert_eq!(binder.slot_for_region(&RegionId::new("R3")), Some(2));
        assert_eq!(binder.bindings()[0].action, "quick:1");
        assert_eq!(binder.generation(), 2);
    }
}
