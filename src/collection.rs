//! Ordered region collection.
//!
//! The collection owns every [`Region`] of a task. It keeps insertion
//! order, resolves ids through an auxiliary index and notifies listeners
//! when regions are created or deleted.

use std::collections::HashMap;
use std::fmt;

use crate::error::StoreError;
use crate::model::{Region, RegionId};

/// Membership change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A region was added
    Created(RegionId),
    /// A region was removed and destroyed
    Deleted(RegionId),
}

impl CollectionEvent {
    pub fn region(&self) -> &RegionId {
        match self {
            CollectionEvent::Created(id) | CollectionEvent::Deleted(id) => id,
        }
    }
}

type Listener = Box<dyn FnMut(&CollectionEvent)>;

/// Ordered container of regions.
#[derive(Default)]
pub struct RegionCollection {
    /// Regions in insertion order.
    regions: Vec<Region>,
    /// Position of each region in `regions`.
    index: HashMap<RegionId, usize>,
    /// Next creation ordinal to hand out.
    next_ordinal: u64,
    listeners: Vec<Listener>,
}

impl RegionCollection {
    pub fn new() -> Self {
        Self {
            next_ordinal: 1,
            ..Self::default()
        }
    }

    /// Register a listener for created/deleted events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&CollectionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Append a region, assigning a creation ordinal if it has none.
    pub fn add(&mut self, mut region: Region) -> Result<CollectionEvent, StoreError> {
        if self.index.contains_key(region.id()) {
            return Err(StoreError::duplicate_region(region.id()));
        }

        if region.has_ordinal() {
            self.next_ordinal = self.next_ordinal.max(region.creation_ordinal() + 1);
        } else {
            region.assign_ordinal(self.next_ordinal);
            self.next_ordinal += 1;
        }

        let id = region.id().clone();
        self.index.insert(id.clone(), self.regions.len());
        self.regions.push(region);
        log::debug!("Added region {}", id);

        let event = CollectionEvent::Created(id);
        self.emit(&event);
        Ok(event)
    }

    /// Remove and destroy a region.
    ///
    /// Children of the removed region are re-parented to its own parent.
    /// Selection eviction is the caller's job, see
    /// [`RegionStore::remove`](crate::store::RegionStore::remove).
    pub fn remove(&mut self, id: &RegionId) -> Option<Region> {
        let position = self.index.remove(id)?;
        let removed = self.regions.remove(position);

        for region in &mut self.regions {
            if region.parent_id.as_ref() == Some(id) {
                region.parent_id = removed.parent_id.clone();
            }
        }

        for (i, region) in self.regions.iter().enumerate().skip(position) {
            self.index.insert(region.id().clone(), i);
        }

        log::debug!("Removed region {}", id);
        self.emit(&CollectionEvent::Deleted(id.clone()));
        Some(removed)
    }

    /// Get a region by id. Unknown ids return `None`.
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    pub fn get_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        self.index.get(id).map(|&i| &mut self.regions[i])
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a region in insertion order.
    pub fn position(&self, id: &RegionId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Regions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.regions.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn emit(&mut self, event: &CollectionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for RegionCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionCollection")
            .field("regions", &self.regions)
            .field("next_ordinal", &self.next_ordinal)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::RegionType;

    fn rect(id: &str) -> Region {
        Region::new(id, RegionType::Rectangle)
    }

    #[test]
    fn test_add_assigns_ordinals() {
        let mut regions = RegionCollection::new();
        regions.add(rect("a")).expect("add a");
        regions.add(rect("b").with_ordinal(10)).expect("add b");
        regions.add(rect("c")).expect("add c");

        let ordinals: Vec<u64> = regions.iter().map(Region::creation_ordinal).collect();
        assert_eq!(ordinals, vec![1, 10, 11]);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut regions = RegionCollection::new();
        regions.add(rect("a")).expect("add a");
        let err = regions.add(rect("a")).unwrap_err();
        assert_eq!(err, StoreError::duplicate_region(&RegionId::new("a")));
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_remove_reparents_children() {
        let mut regions = RegionCollection::new();
        regions.add(rect("root")).expect("add");
        regions.add(rect("mid").with_parent("root")).expect("add");
        regions.add(rect("leaf1").with_parent("mid")).expect("add");
        regions.add(rect("leaf2").with_parent("mid")).expect("add");

        let removed = regions.remove(&RegionId::new("mid"));
        assert!(removed.is_some());

        for id in ["leaf1", "leaf2"] {
            let leaf = regions.get(&RegionId::new(id)).expect("leaf present");
            assert_eq!(leaf.parent_id, Some(RegionId::new("root")));
        }
        assert!(regions.iter().all(|r| r.parent_id != Some(RegionId::new("mid"))));
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut regions = RegionCollection::new();
        for id in ["a", "b", "c", "d"] {
            regions.add(rect(id)).expect("add");
        }
        regions.remove(&RegionId::new("b"));

        let ids: Vec<&str> = regions.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert_eq!(regions.position(&RegionId::new("d")), Some(2));
        assert_eq!(
            regions.get(&RegionId::new("c")).map(|r| r.id().as_str()),
            Some("c")
        );
    }

    #[test]
    fn test_lookup_of_missing_id() {
        let mut regions = RegionCollection::new();
        assert!(regions.get(&RegionId::new("gone")).is_none());
        assert!(regions.remove(&RegionId::new("gone")).is_none());
    }

    #[test]
    fn test_listeners_receive_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut regions = RegionCollection::new();
        let sink = Rc::clone(&events);
        regions.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        regions.add(rect("a")).expect("add");
        regions.remove(&RegionId::new("a"));

        assert_eq!(
            *events.borrow(),
            vec![
                CollectionEvent::Created(RegionId::new("a")),
                CollectionEvent::Deleted(RegionId::new("a")),
            ]
        );
    }
}
