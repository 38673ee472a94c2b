//! Shared controls and merged values.
//!
//! When several regions are selected, every control they contribute to
//! shows the combination of their values. The combination is done by a
//! per-control merge function; a control without one is left untouched.

use std::collections::HashMap;
use std::fmt;

use crate::model::{MainValue, Region};

/// Associative function combining two values of the same control.
pub type MergeFn = Box<dyn Fn(&MainValue, &MainValue) -> MainValue>;

/// Display state of one shared control.
pub struct Control {
    name: String,
    merge: Option<MergeFn>,
    display: Option<MainValue>,
}

impl Control {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value currently shown, `None` when nothing is selected for it.
    pub fn display(&self) -> Option<&MainValue> {
        self.display.as_ref()
    }

    pub fn can_merge(&self) -> bool {
        self.merge.is_some()
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("merge", &self.merge.is_some())
            .field("display", &self.display)
            .finish()
    }
}

/// Registry of the controls of an annotation.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: Vec<Control>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control with its merge function.
    pub fn register<F>(&mut self, name: impl Into<String>, merge: F)
    where
        F: Fn(&MainValue, &MainValue) -> MainValue + 'static,
    {
        self.insert(name.into(), Some(Box::new(merge)));
    }

    /// Register a control that does not support merging.
    pub fn register_without_merge(&mut self, name: impl Into<String>) {
        self.insert(name.into(), None);
    }

    fn insert(&mut self, name: String, merge: Option<MergeFn>) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.name == name) {
            control.merge = merge;
        } else {
            self.controls.push(Control {
                name,
                merge,
                display: None,
            });
        }
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Displayed value of a control.
    pub fn display(&self, name: &str) -> Option<&MainValue> {
        self.get(name).and_then(Control::display)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    /// Recompute every mergeable control from the selected regions.
    ///
    /// Values are folded in the order the regions are given. Controls
    /// without a contributing region are reset to `None`.
    pub fn apply_selection<'a>(&mut self, selected: impl IntoIterator<Item = &'a Region>) {
        let mut merged: HashMap<&str, MainValue> = HashMap::new();

        for region in selected {
            for result in &region.results {
                let Some(control) = self.get(&result.control) else {
                    log::debug!(
                        "Region {} has a result for unknown control '{}'",
                        region.id(),
                        result.control
                    );
                    continue;
                };
                let Some(merge) = control.merge.as_ref() else {
                    log::debug!("Control '{}' has no merge function", control.name);
                    continue;
                };

                let value = match merged.remove(control.name.as_str()) {
                    Some(acc) => merge(&acc, &result.value),
                    None => result.value.clone(),
                };
                merged.insert(control.name.as_str(), value);
            }
        }

        let mut updates: Vec<(usize, Option<MainValue>)> = Vec::new();
        for (i, control) in self.controls.iter().enumerate() {
            if control.merge.is_some() {
                updates.push((i, merged.remove(control.name.as_str())));
            }
        }
        for (i, value) in updates {
            self.controls[i].display = value;
        }
    }
}

// ============================================================================
// Built-in Merge Functions
// ============================================================================

/// Set union of choices (and of text lines), keeping first-seen order.
///
/// Values of different kinds fall back to [`last_write_wins`].
pub fn union(a: &MainValue, b: &MainValue) -> MainValue {
    match (a, b) {
        (MainValue::Choices(x), MainValue::Choices(y)) => MainValue::Choices(union_of(x, y)),
        (MainValue::Text(x), MainValue::Text(y)) => MainValue::Text(union_of(x, y)),
        _ => {
            log::debug!("Cannot union {} with {}, keeping the later value", a.kind(), b.kind());
            last_write_wins(a, b)
        }
    }
}

/// The later value replaces the earlier one.
pub fn last_write_wins(_a: &MainValue, b: &MainValue) -> MainValue {
    b.clone()
}

fn union_of(x: &[String], y: &[String]) -> Vec<String> {
    let mut out = x.to_vec();
    for item in y {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RegionResult, RegionType};

    fn choices(values: &[&str]) -> MainValue {
        MainValue::Choices(values.iter().map(|v| v.to_string()).collect())
    }

    fn region(id: &str, results: Vec<RegionResult>) -> Region {
        let mut region = Region::new(id, RegionType::Rectangle);
        region.results = results;
        region
    }

    #[test]
    fn test_union_keeps_order() {
        let merged = union(&choices(&["a", "b"]), &choices(&["b", "c"]));
        assert_eq!(merged, choices(&["a", "b", "c"]));
    }

    #[test]
    fn test_mismatched_kinds_take_last() {
        let merged = union(&choices(&["a"]), &MainValue::Number(2.0));
        assert_eq!(merged, MainValue::Number(2.0));
    }

    #[test]
    fn test_apply_selection_merges_and_resets() {
        let mut controls = ControlRegistry::new();
        controls.register("choices", union);
        controls.register("rating", last_write_wins);

        let x = region("x", vec![RegionResult::new("choices", choices(&["a"]))]);
        let y = region(
            "y",
            vec![
                RegionResult::new("choices", choices(&["b"])),
                RegionResult::new("rating", MainValue::Rating(4)),
            ],
        );

        controls.apply_selection([&x, &y]);
        assert_eq!(controls.display("choices"), Some(&choices(&["a", "b"])));
        assert_eq!(controls.display("rating"), Some(&MainValue::Rating(4)));

        controls.apply_selection([&x]);
        assert_eq!(controls.display("choices"), Some(&choices(&["a"])));
        assert_eq!(controls.display("rating"), None);
    }

    #[test]
    fn test_control_without_merge_is_skipped() {
        let mut controls = ControlRegistry::new();
        controls.register("choices", union);
        controls.register_without_merge("notes");

        let x = region(
            "x",
            vec![
                RegionResult::new("notes", MainValue::Text(vec!["hi".to_string()])),
                RegionResult::new("choices", choices(&["a"])),
                RegionResult::new("unknown", choices(&["z"])),
            ],
        );

        controls.apply_selection([&x]);
        assert_eq!(controls.display("choices"), Some(&choices(&["a"])));
        assert_eq!(controls.display("notes"), None);
        assert!(controls.get("notes").is_some_and(|c| !c.can_merge()));
    }
}
