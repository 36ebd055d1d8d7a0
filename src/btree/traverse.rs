use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawBTree};

/// Identity of a node within one tree.
///
/// Ids are stable while a node lives. Once a merge or root collapse releases
/// a node, a later split may reuse its id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) const fn from_handle(handle: Handle) -> Self {
        Self(handle.index())
    }

    /// Returns the id as a plain index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node as seen by [`Traverse`].
#[derive(Debug)]
pub struct NodeVisit<'a, K> {
    /// Distance from the root, which is at depth 0.
    pub depth: usize,
    pub id: NodeId,
    pub keys: &'a [K],
    children: &'a [Handle],
}

impl<'a, K> NodeVisit<'a, K> {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ids of this node's children, left to right. Each is yielded later by the
    /// same traversal.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeId> + use<'a, K> {
        self.children.iter().map(|&h| NodeId::from_handle(h))
    }
}

/// A pre-order walk over the nodes of a [`BTree`](crate::BTree).
///
/// This `struct` is created by the [`traverse`] method on
/// [`BTree`](crate::BTree). The walk borrows the tree, so it always observes a
/// single consistent shape; clone it (or call [`traverse`] again) to restart.
///
/// [`traverse`]: crate::BTree::traverse
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Traverse<'a, K> {
    tree: &'a RawBTree<K>,
    pending: Vec<(Handle, usize)>,
}

impl<'a, K> Traverse<'a, K> {
    pub(crate) fn new(tree: &'a RawBTree<K>) -> Self {
        Self {
            tree,
            pending: vec![(tree.root(), 0)],
        }
    }
}

impl<K> Clone for Traverse<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            pending: self.pending.clone(),
        }
    }
}

impl<'a, K> Iterator for Traverse<'a, K> {
    type Item = NodeVisit<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, depth) = self.pending.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        self.pending.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));

        Some(NodeVisit {
            depth,
            id: NodeId::from_handle(handle),
            keys: node.keys(),
            children: node.children(),
        })
    }
}

impl<K> FusedIterator for Traverse<'_, K> {}
