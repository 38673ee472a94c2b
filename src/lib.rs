//! HVAT Regions - region store for annotation tools
//!
//! Keeps the regions of one annotation and everything the outliner panel
//! derives from them: the selection, the filter, the sorted and grouped
//! region tree, merged control values and numbered quick-select hotkeys.
//!
//! [`RegionStore`] is the entry point; the other modules are exposed for
//! callers that need the building blocks on their own.

pub mod click;
pub mod collection;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod filter;
pub mod hotkeys;
pub mod model;
pub mod outliner;
pub mod preferences;
pub mod schedule;
pub mod selection;
pub mod store;
pub mod tree;

#[cfg(test)]
mod tests;

pub use click::{ClickOutcome, Modifiers};
pub use collection::{CollectionEvent, RegionCollection};
pub use config::{ConfigError, StoreConfig};
pub use controls::ControlRegistry;
pub use error::StoreError;
pub use model::{LabelDescriptor, MainValue, Region, RegionData, RegionId, RegionResult, RegionType};
pub use outliner::{GroupingMode, SortKey, SortOrder, ViewMode};
pub use preferences::{MemoryPreferences, Preferences, PreferencesError};
pub use selection::{FlushOnDeselect, HookContext, SelectionHooks};
pub use store::RegionStore;
pub use tree::{GroupNode, RegionTree, TreeItem};
