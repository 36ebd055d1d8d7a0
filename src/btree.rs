use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::Result;
use crate::order::Order;
use crate::raw::{Handle, RawBTree};

mod invariants;
mod traverse;

pub use invariants::{Invariant, Violation};
pub use traverse::{NodeId, NodeVisit, Traverse};

/// An ordered set based on a B-Tree of configurable order.
///
/// Every node holds at most `m - 1` keys and `m` children, where `m` is the
/// tree's [`Order`]. Non-root nodes never fall below `ceil(m/2) - 1` keys and
/// all leaves stay at the same depth, so lookups, insertions and removals all
/// visit O(log n) nodes. Unlike a B+tree, keys are stored once, in whichever
/// node they were promoted to.
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the set. The behavior resulting from such a logic
/// error is not specified, but will be confined to the `BTree` that observed
/// it; [`check_invariants`](BTree::check_invariants) will usually report it.
///
/// # Examples
///
/// ```
/// use mway_tree::BTree;
///
/// let mut primes = BTree::new(4)?;
/// for p in [7, 2, 11, 3, 5, 13] {
///     primes.insert(p);
/// }
///
/// assert!(primes.contains(&5));
/// assert!(!primes.contains(&4));
///
/// primes.remove(&7);
/// assert_eq!(primes.iter().copied().collect::<Vec<_>>(), [2, 3, 5, 11, 13]);
/// assert!(primes.check_invariants().is_empty());
/// # Ok::<(), mway_tree::Error>(())
/// ```
pub struct BTree<K> {
    raw: RawBTree<K>,
}

/// An iterator over the keys of a `BTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`BTree`].
/// See its documentation for more.
///
/// [`iter`]: BTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    tree: &'a RawBTree<K>,
    // Nodes on the path to the next key, each with the index of its next key.
    path: Vec<(Handle, usize)>,
    remaining: usize,
}

impl<K> BTree<K> {
    /// Makes a new, empty `BTree` of order `order`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) if
    /// `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::{BTree, Error};
    ///
    /// let tree: BTree<u32> = BTree::new(3)?;
    /// assert!(tree.is_empty());
    ///
    /// assert_eq!(BTree::<u32>::new(2).err(), Some(Error::InvalidOrder { order: 2 }));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_order(Order::new(order)?))
    }

    /// Makes a new, empty `BTree` from an already validated [`Order`].
    pub fn with_order(order: Order) -> Self {
        Self {
            raw: RawBTree::new(order),
        }
    }

    /// Returns the order this tree was built with.
    #[must_use]
    pub fn order(&self) -> Order {
        self.raw.order()
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut v = BTree::new(3)?;
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of levels in the tree.
    ///
    /// An empty tree and a tree whose root is a leaf both have height 1. The
    /// height grows only when the root splits and shrinks only when the root
    /// is left with a single child.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut tree = BTree::new(3)?;
    /// tree.extend([1, 2]);
    /// assert_eq!(tree.height(), 1);
    /// tree.insert(3);
    /// assert_eq!(tree.height(), 2);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of nodes currently making up the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Clears the set, removing all keys.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first key in the set, if any. This is the minimum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Returns the last key in the set, if any. This is the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Gets an iterator over the keys in the set, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// set.extend([3, 1, 2]);
    ///
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.len(), 2);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.raw)
    }

    /// Walks the nodes of the tree in pre-order, parents before children and
    /// siblings left to right.
    ///
    /// This is the hook for printers and diagram generators: every
    /// [`NodeVisit`] carries the node's depth, id, keys and child ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut tree = BTree::new(4)?;
    /// tree.extend([10, 20, 5, 6]);
    ///
    /// let shape: Vec<(usize, Vec<i32>)> = tree
    ///     .traverse()
    ///     .map(|node| (node.depth, node.keys.to_vec()))
    ///     .collect();
    /// assert_eq!(shape, [(0, vec![10]), (1, vec![5, 6]), (1, vec![20])]);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    pub fn traverse(&self) -> Traverse<'_, K> {
        Traverse::new(&self.raw)
    }
}

impl<K: Ord> BTree<K> {
    /// Returns `true` if the set contains a key equal to `key`.
    ///
    /// The key may be any borrowed form of the set's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// set.extend([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// set.insert(String::from("wabi"));
    /// assert_eq!(set.get("wabi").map(String::as_str), Some("wabi"));
    /// assert_eq!(set.get("sabi"), None);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Adds a key to the set.
    ///
    /// Returns whether the key was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal key, `true` is
    ///   returned.
    /// - If the set already contained an equal key, `false` is returned, and
    ///   the tree is left exactly as it was.
    ///
    /// A full leaf is split around its median, which moves up into the
    /// parent; splits repeat upward while ancestors overflow, and a split of
    /// the root adds a level.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// If the set contains a key equal to `key`, removes it from the set and
    /// drops it. Returns whether such a key was present.
    ///
    /// A key held by an internal node is replaced by its in-order predecessor.
    /// A node left with too few keys borrows one from a sibling through the
    /// parent, or else merges with a sibling; merges repeat upward, and a root
    /// left with a single child is replaced by it.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut set = BTree::new(3)?;
    /// set.extend([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(key)
    }

    /// Checks every structural invariant and returns the ones that do not
    /// hold. An empty result means the tree is well-formed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut tree = BTree::new(3)?;
    /// tree.extend(0..1_000);
    /// for key in (0..1_000).step_by(3) {
    ///     tree.remove(&key);
    /// }
    /// assert_eq!(tree.check_invariants(), []);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn check_invariants(&self) -> Vec<Violation> {
        self.raw.check()
    }
}

impl<K> Default for BTree<K> {
    /// Creates an empty `BTree` of order [`Order::DEFAULT`].
    fn default() -> Self {
        Self::with_order(Order::DEFAULT)
    }
}

impl<K: Clone> Clone for BTree<K> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Two trees are equal when they hold the same keys, whatever their order or
/// shape.
impl<K: PartialEq> PartialEq for BTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for BTree<K> {}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Ord + Copy + 'a> Extend<&'a K> for BTree<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a RawBTree<K>) -> Self {
        let mut iter = Self {
            tree,
            path: Vec::new(),
            remaining: tree.len(),
        };
        iter.descend(tree.root());
        iter
    }

    /// Pushes the path from `handle` down to its leftmost leaf.
    fn descend(&mut self, mut handle: Handle) {
        loop {
            self.path.push((handle, 0));
            match self.tree.node(handle).first_child() {
                Some(child) => handle = child,
                None => return,
            }
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            path: self.path.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.tree;
        loop {
            let &mut (handle, ref mut index) = self.path.last_mut()?;
            let node = tree.node(handle);
            if *index == node.key_count() {
                self.path.pop();
                continue;
            }

            let key = node.key(*index);
            *index += 1;
            let next_child = *index;
            // Keys right of `key` come from the next child's leftmost leaf first.
            if !node.is_leaf() {
                self.descend(node.child(next_child));
            }
            self.remaining -= 1;
            return Some(key);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}
