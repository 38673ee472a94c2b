//! End-to-end outliner scenarios.

use super::{empty_store, id, ids, numbered_store};
use crate::click::Modifiers;
use crate::controls;
use crate::model::{LabelDescriptor, MainValue, Region, RegionResult, RegionType};
use crate::outliner::GroupingMode;

#[test]
fn test_manual_tree_from_parent_chain() {
    let mut store = empty_store();
    store.add(Region::new("A", RegionType::Rectangle)).expect("add");
    store
        .add(Region::new("B", RegionType::Rectangle).with_parent("A"))
        .expect("add");
    store
        .add(Region::new("C", RegionType::Rectangle).with_parent("B"))
        .expect("add");

    let tree = store.regions_tree_with(GroupingMode::Manual, |_, _, _| ());

    assert_eq!(tree.roots().len(), 1);
    let a = &tree.roots()[0];
    assert_eq!(a.region, Some(id("A")));
    assert_eq!(a.children.len(), 1);
    assert_eq!(a.children[0].region, Some(id("B")));
    assert_eq!(a.children[0].children.len(), 1);
    assert_eq!(a.children[0].children[0].region, Some(id("C")));
}

#[test]
fn test_shift_click_ranges_keep_plain_click_anchor() {
    let mut store = numbered_store(5);
    let mut tree = store.regions_tree(|_, _, _| ());

    store.click(&mut tree, &id("R1"), Modifiers::NONE);
    assert_eq!(store.selected_ids(), ids(&["R1"]));

    store.click(&mut tree, &id("R4"), Modifiers::shift());
    assert_eq!(store.selected_ids(), ids(&["R1", "R2", "R3", "R4"]));

    store.click(&mut tree, &id("R2"), Modifiers::shift());
    assert_eq!(store.selected_ids(), ids(&["R1", "R2"]));
}

#[test]
fn test_shrinking_range_keeps_ctrl_selection() {
    let mut store = numbered_store(5);
    let mut tree = store.regions_tree(|_, _, _| ());

    store.click(&mut tree, &id("R1"), Modifiers::NONE);
    store.click(&mut tree, &id("R3"), Modifiers::ctrl());
    store.click(&mut tree, &id("R4"), Modifiers::shift());
    assert_eq!(store.selected_ids(), ids(&["R1", "R2", "R3", "R4"]));

    store.click(&mut tree, &id("R2"), Modifiers::shift());
    assert_eq!(store.selected_ids(), ids(&["R1", "R2", "R3"]));
}

#[test]
fn test_filtered_out_parent_still_holds_children() {
    let mut store = empty_store();
    store.add(Region::new("p", RegionType::Rectangle)).expect("add");
    store
        .add(Region::new("c", RegionType::Rectangle).with_parent("p"))
        .expect("add");

    store.set_filtered_regions(Some(&ids(&["c"])));
    assert!(store.get(&id("p")).is_some_and(Region::is_hidden));

    let tree = store.regions_tree_with(GroupingMode::Manual, |_, _, _| ());
    assert_eq!(tree.roots().len(), 1);
    let p = &tree.roots()[0];
    assert_eq!(p.region, Some(id("p")));
    assert_eq!(p.children.len(), 1);
    assert_eq!(p.children[0].region, Some(id("c")));
}

#[test]
fn test_ctrl_click_toggles_without_moving_anchor() {
    let mut store = numbered_store(4);
    let mut tree = store.regions_tree(|_, _, _| ());

    store.click(&mut tree, &id("R1"), Modifiers::NONE);
    store.click(&mut tree, &id("R3"), Modifiers::ctrl());
    assert_eq!(store.selected_ids(), ids(&["R1", "R3"]));

    store.click(&mut tree, &id("R3"), Modifiers::meta());
    assert_eq!(store.selected_ids(), ids(&["R1"]));

    store.click(&mut tree, &id("R2"), Modifiers::shift());
    assert_eq!(store.selected_ids(), ids(&["R1", "R2"]));
}

#[test]
fn test_plain_click_on_highlighted_region_clears() {
    let mut store = numbered_store(2);
    let mut tree = store.regions_tree(|_, _, _| ());

    store.click(&mut tree, &id("R2"), Modifiers::NONE);
    assert_eq!(store.highlighted(), Some(&id("R2")));

    store.click(&mut tree, &id("R2"), Modifiers::NONE);
    assert!(!store.has_selection());
}

#[test]
fn test_label_groups_keep_same_name_apart() {
    let mut store = empty_store();
    store
        .add(Region::new("a", RegionType::Rectangle).with_label(LabelDescriptor::new("Cat", "L1")))
        .expect("add");
    store
        .add(Region::new("b", RegionType::Rectangle).with_label(LabelDescriptor::new("Cat", "L2")))
        .expect("add");

    let tree = store.regions_tree_with(GroupingMode::Label, |_, _, _| ());

    assert_eq!(tree.roots().len(), 2);
    assert!(tree.roots().iter().all(|g| g.is_group && g.children.len() == 1));
    assert_ne!(tree.roots()[0].id, tree.roots()[1].id);
}

#[test]
fn test_merged_choices_after_tick() {
    let mut store = empty_store();
    store.controls_mut().register("choices", controls::union);
    store
        .add(
            Region::new("X", RegionType::Rectangle).with_result(RegionResult::new(
                "choices",
                MainValue::Choices(vec!["a".into()]),
            )),
        )
        .expect("add");
    store
        .add(
            Region::new("Y", RegionType::Rectangle).with_result(RegionResult::new(
                "choices",
                MainValue::Choices(vec!["b".into()]),
            )),
        )
        .expect("add");

    store.select(&id("X"));
    store.select(&id("Y"));
    assert_eq!(store.controls().display("choices"), None);

    store.tick();
    assert_eq!(
        store.controls().display("choices"),
        Some(&MainValue::Choices(vec!["a".into(), "b".into()]))
    );
}

#[test]
fn test_filter_then_lift_keeps_user_hidden() {
    let mut store = numbered_store(6);
    store.set_region_hidden(&id("R6"), true);

    store.set_filtered_regions(Some(&ids(&["R3"])));
    for r in ["R1", "R2", "R4", "R5"] {
        let region = store.get(&id(r)).expect("region exists");
        assert!(region.is_hidden());
        assert!(region.is_filtered_out());
    }
    assert!(store.get(&id("R3")).is_some_and(|r| !r.is_hidden()));

    store.set_filtered_regions(Some(&ids(&["R1", "R2", "R3", "R4", "R5"])));
    assert!(!store.filter().is_active());
    for r in ["R1", "R2", "R3", "R4", "R5"] {
        assert!(store.get(&id(r)).is_some_and(|r| !r.is_hidden()));
    }
    assert!(store.get(&id("R6")).is_some_and(Region::is_hidden));
}

#[test]
fn test_type_tree_counts_visible_regions() {
    let mut store = empty_store();
    store.add(Region::new("p", RegionType::Polygon)).expect("add");
    store.add(Region::new("r", RegionType::Rectangle)).expect("add");
    store
        .add(Region::new("cls", RegionType::Rectangle).as_classification())
        .expect("add");

    let tree = store.regions_tree_with(GroupingMode::Type, |_, _, _| ());
    let groups: Vec<&str> = tree.roots().iter().map(|g| g.id.as_str()).collect();
    assert_eq!(groups, vec!["polygonregion", "rectangleregion"]);
    assert_eq!(tree.flatten(), ids(&["p", "r"]));
}
