//! Tree nodes produced by the grouping strategies.

use crate::model::{LabelDescriptor, Region, RegionId, RegionType};

/// The entity a node is built for, handed to the enrich callback.
#[derive(Debug, Clone, Copy)]
pub enum TreeItem<'a> {
    /// An area (region) node
    Region(&'a Region),
    /// Header of a label group
    Label(&'a LabelDescriptor),
    /// Header of the group of regions without labels
    Unlabeled,
    /// Header of a region type group
    Type(RegionType),
}

/// A node of the displayed region tree.
///
/// Nodes are rebuilt on every pass and never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode<D> {
    /// Grouping key for headers, node key for areas
    pub id: String,
    pub is_group: bool,
    /// The region shown by an area node
    pub region: Option<RegionId>,
    pub children: Vec<GroupNode<D>>,
    /// Display fields produced by the enrich callback
    pub data: D,
}

impl<D> GroupNode<D> {
    pub(crate) fn area(id: String, region: &Region, data: D) -> Self {
        Self {
            id,
            is_group: false,
            region: Some(region.id().clone()),
            children: Vec::new(),
            data,
        }
    }

    pub(crate) fn group(id: String, data: D, children: Vec<GroupNode<D>>) -> Self {
        Self {
            id,
            is_group: true,
            region: None,
            children,
            data,
        }
    }

    /// Whether this node stands for a region rather than a group.
    pub fn is_area(&self) -> bool {
        self.region.is_some()
    }
}

/// Drops iteratively, so arbitrarily deep trees can be released.
impl<D> Drop for GroupNode<D> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Depth-first, pre-order walk over a forest of nodes.
pub struct Preorder<'a, D> {
    stack: Vec<std::slice::Iter<'a, GroupNode<D>>>,
}

impl<'a, D> Preorder<'a, D> {
    pub(crate) fn new(roots: &'a [GroupNode<D>]) -> Self {
        Self {
            stack: vec![roots.iter()],
        }
    }
}

impl<'a, D> Iterator for Preorder<'a, D> {
    type Item = &'a GroupNode<D>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                Some(node) => {
                    if !node.children.is_empty() {
                        self.stack.push(node.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
