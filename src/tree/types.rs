//! Tree grouped by region type.

use crate::model::{Region, RegionType};
use crate::tree::{GroupNode, TreeItem};

/// One group per region type, in first-seen order.
pub(super) fn build<D, F>(regions: &[&Region], enrich: &mut F) -> Vec<GroupNode<D>>
where
    F: FnMut(TreeItem<'_>, usize, bool) -> D,
{
    let mut groups: Vec<(RegionType, Vec<usize>)> = Vec::new();
    for (i, region) in regions.iter().enumerate() {
        let ty = region.region_type();
        match groups.iter_mut().find(|(t, _)| *t == ty) {
            Some((_, members)) => members.push(i),
            None => groups.push((ty, vec![i])),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(g, (ty, members))| {
            let data = enrich(TreeItem::Type(ty), g, true);
            let children = members
                .into_iter()
                .map(|i| {
                    let region = regions[i];
                    let data = enrich(TreeItem::Region(region), i, false);
                    GroupNode::area(region.id().to_string(), region, data)
                })
                .collect();
            GroupNode::group(ty.as_str().to_string(), data, children)
        })
        .collect()
}
