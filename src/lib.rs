//! An order-m B-tree set for Rust.
//!
//! This crate provides [`BTree`], an ordered set whose fan-out is chosen at
//! runtime. Nodes split on overflow and borrow from or merge with a sibling on
//! underflow, so every leaf stays at the same depth and every non-root node
//! stays between half and completely full.
//!
//! Beyond the usual set operations the tree exposes its shape:
//!
//! - [`traverse`](BTree::traverse) - Walk the nodes in pre-order with their
//!   depth, id and keys, e.g. to print or diagram the tree
//! - [`check_invariants`](BTree::check_invariants) - List every structural
//!   [`Invariant`] that does not hold
//! - [`height`](BTree::height) and [`node_count`](BTree::node_count)
//!
//! # Example
//!
//! ```
//! use mway_tree::BTree;
//!
//! let mut tree = BTree::new(4)?;
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&12));
//! assert!(!tree.contains(&99));
//! assert_eq!(tree.height(), 2);
//!
//! // Print the tree one node per line, indented by depth.
//! for node in tree.traverse() {
//!     println!("{:indent$}{} {:?}", "", node.id, node.keys, indent = node.depth * 2);
//! }
//!
//! tree.remove(&10);
//! assert!(tree.check_invariants().is_empty());
//! # Ok::<(), mway_tree::Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes live in one arena and link to children and parent by index
//! - **Safe** - No `unsafe` code
//!
//! # Logging
//!
//! Structural changes are reported through [`tracing`]: splits, borrows and
//! merges at `TRACE`, root splits and root collapses (with the new height) at
//! `DEBUG`. Lookups are never logged.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

mod error;
mod order;
mod raw;

pub mod btree;

pub use btree::{BTree, Invariant, NodeId, Violation};
pub use error::{Error, Result};
pub use order::Order;
