//! Values that regions contribute to shared controls.

use serde::{Deserialize, Serialize};

/// The main value of a control result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MainValue {
    /// Checked options of a choices control
    Choices(Vec<String>),
    /// Entered lines of a free text control
    Text(Vec<String>),
    /// Numeric value (number input, slider)
    Number(f64),
    /// Star rating
    Rating(u32),
}

impl MainValue {
    /// Short name of the value kind, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MainValue::Choices(_) => "choices",
            MainValue::Text(_) => "text",
            MainValue::Number(_) => "number",
            MainValue::Rating(_) => "rating",
        }
    }
}

/// One `(control, value)` pair a region contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResult {
    /// Name of the control this result belongs to
    pub control: String,
    /// The value contributed by the region
    pub value: MainValue,
}

impl RegionResult {
    pub fn new(control: impl Into<String>, value: MainValue) -> Self {
        Self {
            control: control.into(),
            value,
        }
    }
}
