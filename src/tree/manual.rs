//! Parent/child tree built from `parent_id` links.

use std::collections::HashMap;

use crate::model::{Region, RegionId};
use crate::tree::{GroupNode, TreeItem};

pub(super) fn build<D, F>(regions: &[&Region], enrich: &mut F) -> Vec<GroupNode<D>>
where
    F: FnMut(TreeItem<'_>, usize, bool) -> D,
{
    let index: HashMap<&RegionId, usize> = regions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id(), i))
        .collect();

    let mut parents: Vec<Option<usize>> = regions
        .iter()
        .enumerate()
        .map(|(i, r)| resolve_parent(r, &index).filter(|&p| p != i))
        .collect();
    break_cycles(&mut parents);

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); regions.len()];
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    assemble(&roots, regions, &children, enrich)
}

/// Look up the parent, retrying without a `#...` suffix.
fn resolve_parent(region: &Region, index: &HashMap<&RegionId, usize>) -> Option<usize> {
    let parent_id = region.parent_id.as_ref()?;
    if let Some(&i) = index.get(parent_id) {
        return Some(i);
    }
    let found = parent_id
        .without_suffix()
        .and_then(|base| index.get(&base).copied());
    if found.is_none() {
        log::debug!(
            "Region {} has unresolved parent {}, showing it as a root",
            region.id(),
            parent_id
        );
    }
    found
}

/// Detach one region of every parent cycle, the one listed first.
fn break_cycles(parents: &mut [Option<usize>]) {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; parents.len()];
    let mut path: Vec<usize> = Vec::new();
    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                DONE => break,
                ON_PATH => {
                    let from = path.iter().position(|&p| p == i).unwrap_or(0);
                    if let Some(&first) = path[from..].iter().min() {
                        log::debug!("Parent cycle through tree node {}, detaching it", first);
                        parents[first] = None;
                    }
                    break;
                }
                _ => {
                    state[i] = ON_PATH;
                    path.push(i);
                    current = parents[i];
                }
            }
        }
        for i in path.drain(..) {
            state[i] = DONE;
        }
    }
}

/// Assemble nodes bottom-up; `enrich` still sees regions in display order.
fn assemble<D, F>(
    roots: &[usize],
    regions: &[&Region],
    children: &[Vec<usize>],
    enrich: &mut F,
) -> Vec<GroupNode<D>>
where
    F: FnMut(TreeItem<'_>, usize, bool) -> D,
{
    // Pre-order over the index forest
    let mut order = Vec::with_capacity(regions.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }

    let mut built: Vec<Option<GroupNode<D>>> = Vec::new();
    built.resize_with(regions.len(), || None);
    for &i in &order {
        let region = regions[i];
        let data = enrich(TreeItem::Region(region), i, false);
        built[i] = Some(GroupNode::area(region.id().to_string(), region, data));
    }

    // Children come after their parent in pre-order, so reverse order
    // finishes every subtree before it is attached.
    for &i in order.iter().rev() {
        let kids: Vec<GroupNode<D>> = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(node) = built[i].as_mut() {
            node.children = kids;
        }
    }

    roots.iter().filter_map(|&i| built[i].take()).collect()
}
