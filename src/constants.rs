//! Global constants for the region store

/// Preference key for the sort key (`date` or `score`)
pub const PREF_SORT: &str = "outliner:sort";

/// Preference key for the sort direction (`asc` or `desc`)
pub const PREF_SORT_ORDER: &str = "outliner:sort-direction";

/// Preference key for the grouping mode (`manual`, `label` or `type`)
pub const PREF_GROUP: &str = "outliner:group";

/// Preference key for the view mode (`regions` or `labels`)
pub const PREF_VIEW: &str = "outliner:view";

/// Action prefix of the numbered quick-select hotkeys
pub const DEFAULT_HOTKEY_PREFIX: &str = "region:select";
