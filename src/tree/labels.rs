//! Tree grouped by label.

use std::collections::HashMap;

use crate::model::{LabelDescriptor, NO_LABEL_GROUP, Region};
use crate::tree::{GroupNode, TreeItem};

struct LabelGroup<'a> {
    key: String,
    label: Option<&'a LabelDescriptor>,
    members: Vec<usize>,
}

/// One group per `"<value>#<id>"` label key, in first-seen order.
///
/// A region with several labels appears under each of them; regions
/// without labels go to the `no-label` group.
pub(super) fn build<D, F>(
    regions: &[&Region],
    sort_by_hotkey: bool,
    enrich: &mut F,
) -> Vec<GroupNode<D>>
where
    F: FnMut(TreeItem<'_>, usize, bool) -> D,
{
    let mut groups: Vec<LabelGroup<'_>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (i, region) in regions.iter().enumerate() {
        if region.labels.is_empty() {
            push_member(&mut groups, &mut positions, NO_LABEL_GROUP.to_string(), None, i);
        } else {
            for label in &region.labels {
                push_member(&mut groups, &mut positions, label.group_key(), Some(label), i);
            }
        }
    }

    if sort_by_hotkey {
        // Stable; groups without a hotkey keep their order after the others
        groups.sort_by(|a, b| {
            let ha = a.label.and_then(|l| l.hotkey.as_deref());
            let hb = b.label.and_then(|l| l.hotkey.as_deref());
            match (ha, hb) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(g, group)| {
            let header = match group.label {
                Some(label) => TreeItem::Label(label),
                None => TreeItem::Unlabeled,
            };
            let data = enrich(header, g, true);
            let children = group
                .members
                .iter()
                .map(|&i| {
                    let region = regions[i];
                    let id = format!("{}:{}", group.key, region.id());
                    GroupNode::area(id, region, enrich(TreeItem::Region(region), i, false))
                })
                .collect();
            GroupNode::group(group.key, data, children)
        })
        .collect()
}

fn push_member<'a>(
    groups: &mut Vec<LabelGroup<'a>>,
    positions: &mut HashMap<String, usize>,
    key: String,
    label: Option<&'a LabelDescriptor>,
    member: usize,
) {
    if let Some(&g) = positions.get(&key) {
        let group = &mut groups[g];
        if !group.members.contains(&member) {
            group.members.push(member);
        }
        return;
    }
    positions.insert(key.clone(), groups.len());
    groups.push(LabelGroup {
        key,
        label,
        members: vec![member],
    });
}
