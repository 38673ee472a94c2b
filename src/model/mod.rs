//! Data models for the region store.

mod label;
mod region;
mod value;

pub use label::{LabelDescriptor, NO_LABEL_GROUP};
pub use region::{Region, RegionData, RegionId, RegionType};
pub use value::{MainValue, RegionResult};
