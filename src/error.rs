//! Error types for region store operations.

use thiserror::Error;

use crate::model::RegionId;

/// Errors that can occur when mutating the region collection.
///
/// Referential inconsistencies (dangling parents, selecting deleted ids)
/// are not errors; they degrade to roots and no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A region with this id is already in the collection
    #[error("Region already exists: {id}")]
    DuplicateRegion {
        /// The id that was added twice
        id: RegionId,
    },
}

impl StoreError {
    /// Create a duplicate region error.
    pub fn duplicate_region(id: &RegionId) -> Self {
        Self::DuplicateRegion { id: id.clone() }
    }
}
