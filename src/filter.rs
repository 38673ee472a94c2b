//! Region filter.
//!
//! A filter is an allow-list of regions. It works by hiding every other
//! hideable region and remembering, per region, that the hide came from
//! the filter. Lifting the filter only restores those regions; regions
//! the user hid stay hidden.

use std::collections::HashSet;

use crate::collection::RegionCollection;
use crate::model::RegionId;

/// The active filter, `None` when everything is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    allowed: Option<HashSet<RegionId>>,
}

impl RegionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.allowed.is_some()
    }

    /// Whether the region passes the filter.
    pub fn allows(&self, id: &RegionId) -> bool {
        self.allowed.as_ref().is_none_or(|set| set.contains(id))
    }

    /// Apply a new filter and return the regions it newly hid.
    ///
    /// A filter covering every region not hidden by the user is the same
    /// as no filter.
    pub fn apply(&mut self, regions: &mut RegionCollection, filter: Option<&[RegionId]>) -> Vec<RegionId> {
        let allowed: Option<HashSet<RegionId>> = filter.map(|ids| ids.iter().cloned().collect());
        let covers_all = match &allowed {
            None => true,
            Some(set) => regions
                .iter()
                .filter(|r| r.is_hideable() && !r.is_user_hidden())
                .all(|r| set.contains(r.id())),
        };

        if covers_all {
            self.clear(regions);
            return Vec::new();
        }

        let mut hidden = Vec::new();
        if let Some(set) = &allowed {
            for region in regions.iter_mut() {
                if !region.is_hideable() || (region.is_user_hidden() && !region.is_filtered_out()) {
                    continue;
                }
                if set.contains(region.id()) {
                    region.set_filtered_out(false);
                } else if !region.is_filtered_out() {
                    region.set_filtered_out(true);
                    hidden.push(region.id().clone());
                }
            }
        }
        log::debug!("Filter hid {} regions", hidden.len());
        self.allowed = allowed;
        hidden
    }

    /// Lift the filter, restoring regions it hid.
    pub fn clear(&mut self, regions: &mut RegionCollection) {
        self.allowed = None;
        for region in regions.iter_mut() {
            if region.is_filtered_out() {
                region.set_filtered_out(false);
            }
        }
    }

    /// Forget a deleted region.
    pub fn forget(&mut self, id: &RegionId) {
        if let Some(set) = self.allowed.as_mut() {
            set.remove(id);
        }
    }
}
