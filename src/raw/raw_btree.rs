use core::borrow::Borrow;

use tracing::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, SearchResult};
use crate::Order;

/// The core B-Tree implementation backing `BTree`.
///
/// The arena owns every node; nodes refer to their children and to their
/// parent by [`Handle`]. There is always a root: an empty tree is a single
/// childless root with no keys.
#[derive(Clone)]
pub(crate) struct RawBTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node.
    root: Handle,
    /// Fan-out and occupancy bounds.
    order: Order,
    /// Total number of keys in the tree.
    len: usize,
}

impl<K> RawBTree<K> {
    /// Creates a new, empty tree.
    pub(crate) fn new(order: Order) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new_leaf(None));
        Self {
            nodes,
            root,
            order,
            len: 0,
        }
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of live nodes.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    /// Number of levels; all leaves sit at depth `height - 1`.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Some(child) = self.nodes.get(current).first_child() {
            height += 1;
            current = child;
        }
        height
    }

    /// Drops every key and leaves a single empty root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new_leaf(None));
        self.len = 0;
    }

    /// Leftmost leaf below `handle`.
    fn leftmost_leaf(&self, mut handle: Handle) -> Handle {
        while let Some(child) = self.nodes.get(handle).first_child() {
            handle = child;
        }
        handle
    }

    /// Rightmost leaf below `handle`.
    fn rightmost_leaf(&self, mut handle: Handle) -> Handle {
        while let Some(child) = self.nodes.get(handle).last_child() {
            handle = child;
        }
        handle
    }

    /// Returns the smallest key.
    pub(crate) fn first(&self) -> Option<&K> {
        self.nodes.get(self.leftmost_leaf(self.root)).keys().first()
    }

    /// Returns the largest key.
    pub(crate) fn last(&self) -> Option<&K> {
        self.nodes.get(self.rightmost_leaf(self.root)).keys().last()
    }

    /// Points every child of `handle` back at it.
    fn adopt_children(&mut self, handle: Handle) {
        let count = self.nodes.get(handle).child_count();
        for i in 0..count {
            let child = self.nodes.get(handle).child(i);
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
    }

    /// Returns `(parent, index)` such that `parent.children[index] == handle`.
    fn locate(&self, handle: Handle) -> Option<(Handle, usize)> {
        let parent = self.nodes.get(handle).parent()?;
        let index = self
            .nodes
            .get(parent)
            .position_of(handle)
            .expect("`RawBTree::locate()` - node is missing from its parent!");
        Some((parent, index))
    }
}

impl<K: Ord> RawBTree<K> {
    /// Searches for a key and returns the node handle and key index if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;

        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(index) => return Some((current, index)),
                SearchResult::GoDown(_) if node.is_leaf() => return None,
                SearchResult::GoDown(index) => current = node.child(index),
            }
        }
    }

    /// Returns the stored key equal to `key`.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;
        Some(self.nodes.get(handle).key(index))
    }

    /// Inserts `key`. Returns `false`, leaving the tree untouched, if an equal
    /// key is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let mut current = self.root;

        // Descend to the leaf that owns the key's interval.
        let index = loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(_) => return false,
                SearchResult::GoDown(index) if node.is_leaf() => break index,
                SearchResult::GoDown(index) => current = node.child(index),
            }
        };

        let leaf = self.nodes.get_mut(current);
        let overflows = leaf.is_full(self.order);
        leaf.insert_key(index, key);
        self.len += 1;

        if overflows {
            self.split_upward(current);
        }
        true
    }

    /// Splits `handle` and each ancestor that overflows in turn, growing a new
    /// root if the old one splits.
    fn split_upward(&mut self, mut handle: Handle) {
        while self.nodes.get(handle).is_overflowing(self.order) {
            let (median, right) = self.nodes.get_mut(handle).split();
            let right_handle = self.nodes.alloc(right);
            self.adopt_children(right_handle);

            match self.locate(handle) {
                Some((parent, index)) => {
                    trace!(node = handle.index(), sibling = right_handle.index(), "split node");
                    let parent_node = self.nodes.get_mut(parent);
                    parent_node.insert_key(index, median);
                    parent_node.insert_child(index + 1, right_handle);
                    handle = parent;
                }
                None => {
                    let new_root = self.nodes.alloc(Node::new_root(handle, median, right_handle));
                    self.adopt_children(new_root);
                    self.root = new_root;
                    debug!(root = new_root.index(), height = self.height(), "root split");
                    return;
                }
            }
        }
    }

    /// Removes `key`, returning the stored key if it was present.
    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (handle, index) = self.search(key)?;

        let (removed, leaf) = if self.nodes.get(handle).is_leaf() {
            (self.nodes.get_mut(handle).remove_key(index), handle)
        } else {
            // Swap in the in-order predecessor, then shrink the leaf it came from.
            let leaf = self.rightmost_leaf(self.nodes.get(handle).child(index));
            let (predecessor, _) = self
                .nodes
                .get_mut(leaf)
                .pop_back()
                .expect("`RawBTree::take()` - predecessor leaf is empty!");
            (self.nodes.get_mut(handle).replace_key(index, predecessor), leaf)
        };
        self.len -= 1;

        self.rebalance_upward(leaf);
        Some(removed)
    }

    /// Restores occupancy from `handle` toward the root after a removal.
    ///
    /// A borrow ends the repair; a merge takes a key from the parent, so the
    /// parent is examined next.
    fn rebalance_upward(&mut self, mut handle: Handle) {
        loop {
            let Some((parent, index)) = self.locate(handle) else {
                self.collapse_root();
                return;
            };

            if !self.nodes.get(handle).is_underflowing(self.order) {
                return;
            }

            let parent_node = self.nodes.get(parent);
            let left = index.checked_sub(1).map(|i| parent_node.child(i));
            let right = (index + 1 < parent_node.child_count()).then(|| parent_node.child(index + 1));

            if let Some(left) = left.filter(|&l| self.nodes.get(l).can_lend(self.order)) {
                self.rotate_right(parent, index - 1, left, handle);
                return;
            }
            if let Some(right) = right.filter(|&r| self.nodes.get(r).can_lend(self.order)) {
                self.rotate_left(parent, index, handle, right);
                return;
            }

            match (left, right) {
                (Some(left), _) => self.merge(parent, index - 1, left, handle),
                (None, Some(right)) => self.merge(parent, index, handle, right),
                (None, None) => unreachable!("`RawBTree::rebalance_upward()` - non-root node has no siblings!"),
            }
            handle = parent;
        }
    }

    /// Replaces an internal root that has run out of keys with its only child.
    fn collapse_root(&mut self) {
        let root = self.nodes.get(self.root);
        if root.key_count() > 0 || root.is_leaf() {
            return;
        }

        let child = root.child(0);
        self.nodes.free(self.root);
        self.nodes.get_mut(child).set_parent(None);
        self.root = child;
        debug!(root = child.index(), height = self.height(), "root collapsed");
    }

    /// Moves the separator at `separator` down into `right` and the largest key
    /// of `left` up into its place. `left`'s last child crosses over with it.
    fn rotate_right(&mut self, parent: Handle, separator: usize, left: Handle, right: Handle) {
        let (key, child) = self
            .nodes
            .get_mut(left)
            .pop_back()
            .expect("`RawBTree::rotate_right()` - lender is empty!");
        let separator_key = self.nodes.get_mut(parent).replace_key(separator, key);
        self.nodes.get_mut(right).push_front(separator_key, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(right));
        }
        trace!(from = left.index(), to = right.index(), "borrowed from left sibling");
    }

    /// Mirror of [`rotate_right`](Self::rotate_right): the smallest key of
    /// `right` goes up and the separator comes down into `left`.
    fn rotate_left(&mut self, parent: Handle, separator: usize, left: Handle, right: Handle) {
        let (key, child) = self
            .nodes
            .get_mut(right)
            .pop_front()
            .expect("`RawBTree::rotate_left()` - lender is empty!");
        let separator_key = self.nodes.get_mut(parent).replace_key(separator, key);
        self.nodes.get_mut(left).push_back(separator_key, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(left));
        }
        trace!(from = right.index(), to = left.index(), "borrowed from right sibling");
    }

    /// Folds `right` and the separator between them into `left` and releases
    /// `right`.
    fn merge(&mut self, parent: Handle, separator: usize, left: Handle, right: Handle) {
        let parent_node = self.nodes.get_mut(parent);
        let separator_key = parent_node.remove_key(separator);
        let removed = parent_node.remove_child(separator + 1);
        debug_assert_eq!(removed, right, "`RawBTree::merge()` - separator does not divide siblings!");

        let right_node = self.nodes.take(right);
        self.nodes.get_mut(left).merge_with_right(separator_key, right_node);
        self.adopt_children(left);
        trace!(into = left.index(), released = right.index(), "merged siblings");
    }
}
