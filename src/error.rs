//! Error types for `mway_tree`.

/// Convenient `Result` alias for fallible tree configuration.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the public API.
///
/// Only configuration can fail. Inserting a key that is already present and
/// removing or looking up one that is absent are ordinary outcomes, reported
/// through `bool`/`Option` returns rather than through this type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested order cannot produce a valid B-tree.
    ///
    /// A node must be able to hold at least two children, and a split must
    /// leave both halves non-empty, so the order must be at least
    /// [`Order::MIN`](crate::Order::MIN).
    #[error("invalid B-tree order {order}: must be at least {min}", min = crate::Order::MIN)]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
}
