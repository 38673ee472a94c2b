//! Outliner settings: sorting, grouping and view mode.
//!
//! All four settings are persisted through [`Preferences`] and written
//! synchronously on every change. Bad stored values never break the view;
//! they are logged and replaced by the default.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{PREF_GROUP, PREF_SORT, PREF_SORT_ORDER, PREF_VIEW};
use crate::model::Region;
use crate::preferences::Preferences;

/// A persisted setting value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {setting} value '{value}'")]
pub struct ParseModeError {
    /// Which setting was being parsed
    pub setting: &'static str,
    /// The rejected value
    pub value: String,
}

impl ParseModeError {
    fn new(setting: &'static str, value: &str) -> Self {
        Self {
            setting,
            value: value.to_string(),
        }
    }
}

/// Declares a string-backed settings enum with `as_str`, `Display` and `FromStr`.
macro_rules! setting_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $setting:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// The persisted string form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            /// Get all values.
            pub fn all() -> &'static [$name] {
                &[$( $name::$variant ),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseModeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(ParseModeError::new($setting, s)),
                }
            }
        }
    };
}

setting_enum! {
    /// Key the region list is sorted by.
    SortKey, "sort" {
        /// Creation order
        #[default]
        Date => "date",
        /// Prediction score
        Score => "score",
    }
}

setting_enum! {
    /// Sort direction.
    SortOrder, "sort direction" {
        #[default]
        Asc => "asc",
        Desc => "desc",
    }
}

setting_enum! {
    /// How the region tree is grouped.
    GroupingMode, "grouping" {
        /// Parent/child links
        #[default]
        Manual => "manual",
        /// One group per label
        Label => "label",
        /// One group per region type
        Type => "type",
    }
}

setting_enum! {
    /// Which side panel list is shown.
    ViewMode, "view" {
        /// Flat region list
        #[default]
        Regions => "regions",
        /// Grouped label list
        Labels => "labels",
    }
}

impl SortOrder {
    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Sort regions by key and direction. The sort is stable.
///
/// Regions without a score sort before scored ones in ascending order.
pub fn sort_regions(regions: &mut [&Region], key: SortKey, order: SortOrder) {
    regions.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => a.creation_ordinal().cmp(&b.creation_ordinal()),
            SortKey::Score => compare_scores(a.score, b.score),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Defaults used when nothing is stored yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlinerDefaults {
    pub sort: SortKey,
    pub order: SortOrder,
    pub grouping: GroupingMode,
    /// Per-task display preference
    pub view: ViewMode,
}

/// Persisted sort, grouping and view settings.
pub struct OutlinerSettings {
    sort: SortKey,
    order: SortOrder,
    grouping: GroupingMode,
    view: ViewMode,
    prefs: Box<dyn Preferences>,
}

impl OutlinerSettings {
    /// Read the settings, falling back to `defaults` for missing or bad values.
    pub fn load(prefs: Box<dyn Preferences>, defaults: OutlinerDefaults) -> Self {
        let sort = read(&*prefs, PREF_SORT, defaults.sort);
        let order = read(&*prefs, PREF_SORT_ORDER, defaults.order);
        let grouping = read(&*prefs, PREF_GROUP, defaults.grouping);
        let view = read(&*prefs, PREF_VIEW, defaults.view);
        Self {
            sort,
            order,
            grouping,
            view,
            prefs,
        }
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Choose a sort key. The same key again flips the direction, a new
    /// key starts ascending.
    pub fn set_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.order = self.order.reversed();
        } else {
            self.sort = key;
            self.order = SortOrder::Asc;
        }
        self.write(PREF_SORT, self.sort.as_str());
        self.write(PREF_SORT_ORDER, self.order.as_str());
    }

    pub fn set_grouping(&mut self, mode: GroupingMode) {
        self.grouping = mode;
        self.write(PREF_GROUP, mode.as_str());
    }

    /// Set the grouping from an untrusted string.
    ///
    /// Unknown values are logged and treated as manual grouping.
    pub fn set_grouping_str(&mut self, mode: &str) {
        let mode = mode.parse().unwrap_or_else(|e: ParseModeError| {
            log::warn!("{}, falling back to manual grouping", e);
            GroupingMode::Manual
        });
        self.set_grouping(mode);
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        self.write(PREF_VIEW, view.as_str());
    }

    /// Sort regions by the current key and direction.
    pub fn sort_regions(&self, regions: &mut [&Region]) {
        sort_regions(regions, self.sort, self.order);
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.prefs.set(key, value) {
            log::warn!("Failed to persist preference '{}': {}", key, e);
        }
    }
}

impl fmt::Debug for OutlinerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlinerSettings")
            .field("sort", &self.sort)
            .field("order", &self.order)
            .field("grouping", &self.grouping)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

fn read<T>(prefs: &dyn Preferences, key: &str, default: T) -> T
where
    T: FromStr<Err = ParseModeError> + Copy,
{
    match prefs.get(key) {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|e| {
            log::warn!("{} in preference '{}', using default", e, key);
            default
        }),
    }
}
