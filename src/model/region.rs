//! Region data model.
//!
//! A region is one annotated entity of a task: a shape, a text span or a
//! pure classification. Regions are owned by the
//! [`RegionCollection`](crate::collection::RegionCollection); everything
//! else refers to them by [`RegionId`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{LabelDescriptor, RegionResult};
use crate::selection::{FlushOnDeselect, HookContext, SelectionHooks};

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a region within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with a trailing `#...` disambiguator removed.
    ///
    /// Composite ids such as `"abc#2"` refer to the region `"abc"`.
    /// Returns `None` when there is no suffix to strip.
    pub fn without_suffix(&self) -> Option<RegionId> {
        self.0
            .rsplit_once('#')
            .map(|(base, _)| RegionId::new(base))
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Region Types
// ============================================================================

/// The kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    #[serde(rename = "rectangleregion")]
    Rectangle,
    #[serde(rename = "ellipseregion")]
    Ellipse,
    #[serde(rename = "polygonregion")]
    Polygon,
    #[serde(rename = "keypointregion")]
    KeyPoint,
    #[serde(rename = "brushregion")]
    Brush,
    #[serde(rename = "richtextregion")]
    RichText,
    #[serde(rename = "textarearegion")]
    TextArea,
    #[serde(rename = "audioregion")]
    Audio,
    #[serde(rename = "timeseriesregion")]
    TimeSeries,
    #[serde(rename = "videorectangleregion")]
    VideoRectangle,
    #[serde(rename = "paragraphs")]
    Paragraphs,
}

impl RegionType {
    /// The type key used for grouping, e.g. `"rectangleregion"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionType::Rectangle => "rectangleregion",
            RegionType::Ellipse => "ellipseregion",
            RegionType::Polygon => "polygonregion",
            RegionType::KeyPoint => "keypointregion",
            RegionType::Brush => "brushregion",
            RegionType::RichText => "richtextregion",
            RegionType::TextArea => "textarearegion",
            RegionType::Audio => "audioregion",
            RegionType::TimeSeries => "timeseriesregion",
            RegionType::VideoRectangle => "videorectangleregion",
            RegionType::Paragraphs => "paragraphs",
        }
    }

    /// Display name: the type key without its trailing `region`.
    pub fn display_name(&self) -> &'static str {
        let key = self.as_str();
        key.strip_suffix("region").unwrap_or(key)
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Region
// ============================================================================

/// A single annotated region.
pub struct Region {
    id: RegionId,
    /// Id of the parent region, possibly with a `#...` suffix.
    pub parent_id: Option<RegionId>,
    region_type: RegionType,
    creation_ordinal: Option<u64>,
    /// Confidence score (predictions only).
    pub score: Option<f64>,
    /// Pure classification, not a spatial or temporal area.
    pub classification: bool,
    /// Labels attached to this region.
    pub labels: Vec<LabelDescriptor>,
    /// Values this region contributes to shared controls.
    pub results: Vec<RegionResult>,
    user_hidden: bool,
    filtered_out: bool,
    selected: bool,
    drawing_selected: bool,
    flush: Option<Box<dyn FlushOnDeselect>>,
    hooks: Option<Box<dyn SelectionHooks>>,
}

impl Region {
    /// Create a new visible region without parent, labels or results.
    pub fn new(id: impl Into<RegionId>, region_type: RegionType) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            region_type,
            creation_ordinal: None,
            score: None,
            classification: false,
            labels: Vec::new(),
            results: Vec::new(),
            user_hidden: false,
            filtered_out: false,
            selected: false,
            drawing_selected: false,
            flush: None,
            hooks: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<RegionId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_ordinal(mut self, ordinal: u64) -> Self {
        self.creation_ordinal = Some(ordinal);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_label(mut self, label: LabelDescriptor) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_result(mut self, result: RegionResult) -> Self {
        self.results.push(result);
        self
    }

    /// Mark this region as a classification (excluded from the tree).
    pub fn as_classification(mut self) -> Self {
        self.classification = true;
        self
    }

    /// Start out hidden by the user.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.user_hidden = hidden;
        self
    }

    /// Attach a hook that flushes pending edits before the region is unselected.
    pub fn with_flush_hook(mut self, flush: impl FlushOnDeselect + 'static) -> Self {
        self.flush = Some(Box::new(flush));
        self
    }

    /// Attach selection lifecycle hooks.
    pub fn with_selection_hooks(mut self, hooks: impl SelectionHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn region_type(&self) -> RegionType {
        self.region_type
    }

    /// Creation ordinal, the default sort key. Zero until the region is added.
    pub fn creation_ordinal(&self) -> u64 {
        self.creation_ordinal.unwrap_or(0)
    }

    pub(crate) fn has_ordinal(&self) -> bool {
        self.creation_ordinal.is_some()
    }

    pub(crate) fn assign_ordinal(&mut self, ordinal: u64) {
        self.creation_ordinal = Some(ordinal);
    }

    /// Hidden for any reason (user toggle or active filter).
    ///
    /// Classifications are never hidden.
    pub fn is_hidden(&self) -> bool {
        self.is_hideable() && (self.user_hidden || self.filtered_out)
    }

    /// Hidden by an explicit user action.
    pub fn is_user_hidden(&self) -> bool {
        self.is_hideable() && self.user_hidden
    }

    /// Hidden because it does not match the active filter.
    pub fn is_filtered_out(&self) -> bool {
        self.filtered_out
    }

    /// Whether visibility toggles apply to this region.
    pub fn is_hideable(&self) -> bool {
        !self.classification
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_drawing_selected(&self) -> bool {
        self.drawing_selected
    }

    /// Whether the region carries the given label (matched by value and id).
    pub fn has_label(&self, label: &LabelDescriptor) -> bool {
        self.labels
            .iter()
            .any(|l| l.value == label.value && l.id == label.id)
    }

    pub(crate) fn set_user_hidden(&mut self, hidden: bool) {
        self.user_hidden = hidden;
    }

    pub(crate) fn set_filtered_out(&mut self, filtered: bool) {
        self.filtered_out = filtered;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_drawing_selected(&mut self, selected: bool) {
        self.drawing_selected = selected;
    }

    pub(crate) fn notify_before_unselect(&mut self, selected_count: usize) {
        if let Some(flush) = self.flush.as_mut() {
            flush.flush_before_unselect(&HookContext {
                region: &self.id,
                selected_count,
            });
        }
    }

    pub(crate) fn notify_after_unselect(&mut self, selected_count: usize) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.after_unselect(&HookContext {
                region: &self.id,
                selected_count,
            });
        }
    }

    pub(crate) fn notify_after_selected(&mut self, selected_count: usize) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.after_selected(&HookContext {
                region: &self.id,
                selected_count,
            });
        }
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("type", &self.region_type)
            .field("creation_ordinal", &self.creation_ordinal)
            .field("score", &self.score)
            .field("classification", &self.classification)
            .field("labels", &self.labels)
            .field("user_hidden", &self.user_hidden)
            .field("filtered_out", &self.filtered_out)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Serialized Form
// ============================================================================

/// Serializable description of a region, used to load regions from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionData {
    pub id: RegionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RegionId>,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub classification: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub labels: Vec<LabelDescriptor>,
    #[serde(default)]
    pub results: Vec<RegionResult>,
}

impl From<RegionData> for Region {
    fn from(data: RegionData) -> Self {
        let hidden = data.hidden && !data.classification;
        let mut region = Region::new(data.id, data.region_type).with_hidden(hidden);
        region.parent_id = data.parent_id;
        region.creation_ordinal = data.ordinal;
        region.score = data.score;
        region.classification = data.classification;
        region.labels = data.labels;
        region.results = data.results;
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_suffix() {
        assert_eq!(
            RegionId::new("abc#2").without_suffix(),
            Some(RegionId::new("abc"))
        );
        assert_eq!(RegionId::new("abc").without_suffix(), None);
    }

    #[test]
    fn test_type_display_name_strips_region() {
        assert_eq!(RegionType::Rectangle.display_name(), "rectangle");
        assert_eq!(RegionType::VideoRectangle.display_name(), "videorectangle");
        assert_eq!(RegionType::Paragraphs.display_name(), "paragraphs");
    }

    #[test]
    fn test_hidden_flags_are_independent() {
        let mut region = Region::new("a", RegionType::Polygon);
        assert!(!region.is_hidden());

        region.set_filtered_out(true);
        assert!(region.is_hidden());
        assert!(!region.is_user_hidden());

        region.set_user_hidden(true);
        region.set_filtered_out(false);
        assert!(region.is_hidden());
    }

    #[test]
    fn test_region_data_from_json() {
        let json = r#"{
            "id": "r1",
            "parent_id": "r0#1",
            "type": "rectangleregion",
            "score": 0.5,
            "labels": [{ "value": "Cat", "id": "L1", "hotkey": "c" }],
            "results": [{ "control": "choices", "value": { "type": "choices", "value": ["a"] } }]
        }"#;

        let data: RegionData = serde_json::from_str(json).expect("Failed to parse region");
        let region = Region::from(data);
        assert_eq!(region.id().as_str(), "r1");
        assert_eq!(region.region_type(), RegionType::Rectangle);
        assert_eq!(region.parent_id, Some(RegionId::new("r0#1")));
        assert_eq!(region.labels[0].hotkey.as_deref(), Some("c"));
        assert_eq!(region.results.len(), 1);
        assert!(!region.has_ordinal());
    }

    #[test]
    fn test_classification_is_never_hidden() {
        let json = r#"{ "id": "c", "type": "textarearegion", "classification": true, "hidden": true }"#;
        let data: RegionData = serde_json::from_str(json).expect("Failed to parse region");
        let mut region = Region::from(data);
        assert!(!region.is_user_hidden());

        region.set_user_hidden(true);
        region.set_filtered_out(true);
        assert!(!region.is_hidden());
    }

    #[test]
    fn test_unknown_region_type_is_rejected() {
        let json = r#"{ "id": "r1", "type": "hexagonregion" }"#;
        assert!(serde_json::from_str::<RegionData>(json).is_err());
    }
}
