//! Label descriptors attached to regions.

use serde::{Deserialize, Serialize};

/// Group key used for regions that carry no label at all.
pub const NO_LABEL_GROUP: &str = "no-label";

/// A label attached to a region by a labeling control.
///
/// Two descriptors with the same `value` but a different `id` come from
/// different controls and are never treated as the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelDescriptor {
    /// Display text of the label
    pub value: String,
    /// Identifier of the label within its control
    pub id: String,
    /// Hotkey assigned to the label in the labeling config, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
}

impl LabelDescriptor {
    /// Create a new label descriptor without a hotkey.
    pub fn new(value: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            id: id.into(),
            hotkey: None,
        }
    }

    pub fn with_hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = Some(hotkey.into());
        self
    }

    /// Composite grouping key, `"<value>#<id>"`.
    pub fn group_key(&self) -> String {
        format!("{}#{}", self.value, self.id)
    }
}
