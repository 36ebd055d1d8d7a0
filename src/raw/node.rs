use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;
use crate::Order;

// Nodes of small-order trees stay inline; larger orders spill to the heap.
pub(crate) const INLINE_KEYS: usize = 8;
pub(crate) const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

pub(crate) type Keys<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type Children = SmallVec<[Handle; INLINE_CHILDREN]>;

/// A B-tree node.
///
/// Unlike a B+tree, keys live in internal nodes too: `children[i]` holds every
/// key strictly between `keys[i - 1]` and `keys[i]`. A node is a leaf exactly
/// when it has no children.
#[derive(Clone)]
pub(crate) struct Node<K> {
    // Non-owning; `None` for the root.
    parent: Option<Handle>,
    keys: Keys<K>,
    children: Children,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; the index is both its insertion point and the child
    /// to descend into.
    GoDown(usize),
}

impl<K> Node<K> {
    /// Creates an empty leaf.
    pub(crate) fn new_leaf(parent: Option<Handle>) -> Self {
        Self {
            parent,
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    /// Creates an internal node holding one separator between two children.
    pub(crate) fn new_root(left: Handle, separator: K, right: Handle) -> Self {
        let mut keys = SmallVec::new();
        keys.push(separator);
        let mut children = SmallVec::new();
        children.push(left);
        children.push(right);
        Self {
            parent: None,
            keys,
            children,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn is_full(&self, order: Order) -> bool {
        self.keys.len() >= order.max_keys()
    }

    /// Returns true if the node has overflowed and must be split.
    pub(crate) fn is_overflowing(&self, order: Order) -> bool {
        self.keys.len() > order.max_keys()
    }

    /// Only meaningful for non-root nodes.
    pub(crate) fn is_underflowing(&self, order: Order) -> bool {
        self.keys.len() < order.min_keys()
    }

    /// Returns true if a sibling can take one key without underflowing.
    pub(crate) fn can_lend(&self, order: Order) -> bool {
        self.keys.len() > order.min_keys()
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn first_child(&self) -> Option<Handle> {
        self.children.first().copied()
    }

    pub(crate) fn last_child(&self) -> Option<Handle> {
        self.children.last().copied()
    }

    /// Position of `child` in this node's child list.
    ///
    /// Matches on the handle rather than on keys, so it also works for a child
    /// that has been emptied by a removal.
    pub(crate) fn position_of(&self, child: Handle) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Index of the child whose key interval contains `key`.
    ///
    /// This is the number of keys less than `key`, found by binary search. For
    /// a key equal to `keys[i]` it is `i`, the subtree holding the in-order
    /// predecessor.
    #[inline]
    pub(crate) fn find_child_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow().cmp(key) == Ordering::Less)
    }

    /// Binary-searches the keys of this node.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let index = self.find_child_index(key);
        match self.keys.get(index) {
            Some(k) if k.borrow().cmp(key) == Ordering::Equal => SearchResult::Found(index),
            _ => SearchResult::GoDown(index),
        }
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> Handle {
        self.children.remove(index)
    }

    /// Swaps in a new key at `index`, returning the old one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Removes the largest key and, for an internal node, the last child.
    pub(crate) fn pop_back(&mut self) -> Option<(K, Option<Handle>)> {
        let key = self.keys.pop()?;
        Some((key, self.children.pop()))
    }

    /// Removes the smallest key and, for an internal node, the first child.
    pub(crate) fn pop_front(&mut self) -> Option<(K, Option<Handle>)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = (!self.children.is_empty()).then(|| self.children.remove(0));
        Some((key, child))
    }

    pub(crate) fn push_back(&mut self, key: K, child: Option<Handle>) {
        self.keys.push(key);
        self.children.extend(child);
    }

    pub(crate) fn push_front(&mut self, key: K, child: Option<Handle>) {
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Splits an overflowing node around its upper median.
    ///
    /// Returns `(median, right)`: this node keeps `keys[..mid]` and
    /// `children[..=mid]`, `right` receives the rest and shares this node's
    /// parent. The caller must re-parent `right`'s children.
    pub(crate) fn split(&mut self) -> (K, Node<K>) {
        let mid = self.keys.len() / 2;

        let right_keys: Keys<K> = self.keys.drain(mid + 1..).collect();
        let right_children: Children = if self.is_leaf() {
            SmallVec::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };
        let median = self.keys.pop().expect("`Node::split()` - node has no median!");

        let right = Node {
            parent: self.parent,
            keys: right_keys,
            children: right_children,
        };
        (median, right)
    }

    /// Absorbs `separator` and the right sibling `right`.
    /// The caller must re-parent `right`'s children.
    pub(crate) fn merge_with_right(&mut self, separator: K, right: Node<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn leaf(keys: &[i32]) -> Node<i32> {
        let mut node = Node::new_leaf(None);
        for (i, &k) in keys.iter().enumerate() {
            node.insert_key(i, k);
        }
        node
    }

    fn handles(range: core::ops::Range<usize>) -> Vec<Handle> {
        range.map(Handle::from_index).collect()
    }

    #[test]
    fn find_child_index_routes_by_interval() {
        let node = leaf(&[10, 20, 30]);
        assert_eq!(node.find_child_index(&5), 0);
        assert_eq!(node.find_child_index(&10), 0);
        assert_eq!(node.find_child_index(&15), 1);
        assert_eq!(node.find_child_index(&25), 2);
        assert_eq!(node.find_child_index(&35), 3);
    }

    #[test]
    fn occupancy_predicates() {
        let order = Order::new(4).unwrap();
        assert!(leaf(&[]).is_underflowing(order));
        assert!(!leaf(&[1]).is_underflowing(order));
        assert!(!leaf(&[1]).can_lend(order));
        assert!(leaf(&[1, 2]).can_lend(order));
        assert!(leaf(&[1, 2, 3]).is_full(order));
        assert!(!leaf(&[1, 2, 3]).is_overflowing(order));
        assert!(leaf(&[1, 2, 3, 4]).is_overflowing(order));
    }

    #[test]
    fn split_leaf_uses_upper_median() {
        let mut node = leaf(&[1, 2, 3, 4]);
        let (median, right) = node.split();
        assert_eq!(median, 3);
        assert_eq!(node.keys(), &[1, 2]);
        assert_eq!(right.keys(), &[4]);
        assert!(right.is_leaf());
    }

    #[test]
    fn split_internal_moves_children() {
        let mut node = leaf(&[10, 20, 30, 40, 50]);
        for (i, h) in handles(0..6).into_iter().enumerate() {
            node.insert_child(i, h);
        }

        let (median, right) = node.split();
        assert_eq!(median, 30);
        assert_eq!(node.keys(), &[10, 20]);
        assert_eq!(node.children(), handles(0..3).as_slice());
        assert_eq!(right.keys(), &[40, 50]);
        assert_eq!(right.children(), handles(3..6).as_slice());
    }

    #[test]
    fn merge_pulls_separator_down() {
        let mut left = leaf(&[1, 2]);
        left.merge_with_right(5, leaf(&[7, 8]));
        assert_eq!(left.keys(), &[1, 2, 5, 7, 8]);
    }

    #[test]
    fn rotations_carry_children() {
        let mut node = leaf(&[10, 20]);
        for (i, h) in handles(0..3).into_iter().enumerate() {
            node.insert_child(i, h);
        }

        let (key, child) = node.pop_front().unwrap();
        assert_eq!((key, child), (10, Some(Handle::from_index(0))));
        node.push_back(30, Some(Handle::from_index(7)));
        assert_eq!(node.keys(), &[20, 30]);
        assert_eq!(node.last_child(), Some(Handle::from_index(7)));

        let (key, child) = node.pop_back().unwrap();
        assert_eq!((key, child), (30, Some(Handle::from_index(7))));
        node.push_front(5, Some(Handle::from_index(9)));
        assert_eq!(node.keys(), &[5, 20]);
        assert_eq!(node.first_child(), Some(Handle::from_index(9)));
        assert_eq!(node.position_of(Handle::from_index(2)), Some(2));
    }

    #[test]
    fn leaf_rotations_have_no_children() {
        let mut node = leaf(&[1, 2]);
        assert_eq!(node.pop_front(), Some((1, None)));
        assert_eq!(node.pop_back(), Some((2, None)));
        assert_eq!(node.pop_back(), None);
        assert_eq!(node.pop_front(), None);
    }
}
