use alloc::vec;
use alloc::vec::Vec;

use super::handle::Handle;
use super::raw_btree::RawBTree;
use crate::btree::{Invariant, NodeId, Violation};

/// A node still to be checked, with the context its parent implies.
struct Frame<'a, K> {
    node: Handle,
    depth: usize,
    parent: Option<Handle>,
    // Exclusive bounds inherited from the ancestors' separators.
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord> RawBTree<K> {
    /// Walks the whole tree and reports every broken structural invariant.
    pub(crate) fn check(&self) -> Vec<Violation> {
        let order = self.order();
        let mut violations = Vec::new();
        let mut report = |invariant, node: Handle| {
            violations.push(Violation {
                invariant,
                node: NodeId::from_handle(node),
            });
        };

        let mut leaf_depth = None;
        let mut key_total = 0usize;
        let mut stack = vec![Frame {
            node: self.root(),
            depth: 0,
            parent: None,
            lower: None,
            upper: None,
        }];

        while let Some(frame) = stack.pop() {
            let handle = frame.node;
            let node = self.node(handle);
            let keys = node.keys();
            let is_root = handle == self.root();
            key_total += keys.len();

            let overfull = keys.len() > order.max_keys();
            let underfull = if is_root {
                keys.is_empty() && !node.is_leaf()
            } else {
                node.is_underflowing(order)
            };
            if overfull || underfull {
                report(Invariant::Occupancy, handle);
            }

            if !node.is_leaf() && node.child_count() != keys.len() + 1 {
                report(Invariant::ChildCount, handle);
            }

            let ascending = keys.windows(2).all(|pair| pair[0] < pair[1]);
            let bounded = keys.iter().all(|k| {
                frame.lower.is_none_or(|lower| lower < k) && frame.upper.is_none_or(|upper| k < upper)
            });
            if !ascending || !bounded {
                report(Invariant::KeyOrder, handle);
            }

            if node.parent() != frame.parent {
                report(Invariant::ParentLink, handle);
            }

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(frame.depth),
                    Some(depth) if depth != frame.depth => report(Invariant::LeafDepth, handle),
                    Some(_) => {}
                }
                continue;
            }

            // Reversed so that children are visited left to right.
            for (i, &child) in node.children().iter().enumerate().rev() {
                stack.push(Frame {
                    node: child,
                    depth: frame.depth + 1,
                    parent: Some(handle),
                    lower: if i == 0 { frame.lower } else { keys.get(i - 1) },
                    upper: keys.get(i).or(frame.upper),
                });
            }
        }

        if key_total != self.len() {
            report(Invariant::Length, self.root());
        }
        violations
    }
}
