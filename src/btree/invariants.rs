use core::fmt;

use super::NodeId;

/// A structural property every [`BTree`](crate::BTree) maintains between
/// operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Invariant {
    /// A non-root node holds between `ceil(m/2) - 1` and `m - 1` keys; the
    /// root holds at most `m - 1`, and at least one if it has children.
    Occupancy,
    /// An internal node has exactly one more child than it has keys.
    ChildCount,
    /// Every leaf is at the same depth.
    LeafDepth,
    /// Keys ascend strictly within a node and fall strictly between the
    /// separators that enclose the node's subtree.
    KeyOrder,
    /// A node's parent link names the node whose child list contains it; the
    /// root has no parent.
    ParentLink,
    /// The tree's element count equals the number of stored keys.
    Length,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Invariant::Occupancy => "occupancy",
            Invariant::ChildCount => "child count",
            Invariant::LeafDepth => "leaf depth",
            Invariant::KeyOrder => "key order",
            Invariant::ParentLink => "parent link",
            Invariant::Length => "length",
        };
        f.write_str(name)
    }
}

/// One broken [`Invariant`], reported by
/// [`BTree::check_invariants`](crate::BTree::check_invariants).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Violation {
    pub invariant: Invariant,
    /// The offending node. [`Invariant::Length`] is reported against the root.
    pub node: NodeId,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invariant violated at node {}", self.invariant, self.node)
    }
}
