use crate::error::{Error, Result};

/// The branching factor of a [`BTree`](crate::BTree): the maximum number of
/// children any node may have.
///
/// An order is validated once, at construction, and every occupancy bound the
/// tree enforces is derived from it:
///
/// | bound            | value            |
/// |------------------|------------------|
/// | `max_children()` | `m`              |
/// | `max_keys()`     | `m - 1`          |
/// | `min_keys()`     | `ceil(m/2) - 1`  |
///
/// # Examples
///
/// ```
/// use mway_tree::Order;
///
/// let order = Order::new(5).unwrap();
/// assert_eq!(order.max_keys(), 4);
/// assert_eq!(order.min_keys(), 2);
///
/// assert!(Order::new(2).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Order(usize);

impl Order {
    /// The smallest order that yields a well-formed B-tree.
    pub const MIN: usize = 3;

    /// The order used by [`BTree::default`](crate::BTree::default).
    pub const DEFAULT: Self = Self(16);

    /// Validates `m` as a B-tree order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `m < Order::MIN`.
    pub const fn new(m: usize) -> Result<Self> {
        if m < Self::MIN {
            return Err(Error::InvalidOrder { order: m });
        }
        Ok(Self(m))
    }

    /// Returns `m`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn max_children(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn max_keys(self) -> usize {
        self.0 - 1
    }

    /// The fewest keys a non-root node may hold.
    #[must_use]
    pub const fn min_keys(self) -> usize {
        self.0.div_ceil(2) - 1
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Order {
    type Error = Error;

    fn try_from(m: usize) -> Result<Self> {
        Self::new(m)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_degenerate_orders() {
        for m in 0..Order::MIN {
            assert_eq!(Order::new(m), Err(Error::InvalidOrder { order: m }));
        }
    }

    #[test]
    fn bounds_for_small_orders() {
        let bounds: [(usize, usize, usize); 4] = [(3, 2, 1), (4, 3, 1), (5, 4, 2), (6, 5, 2)];
        for (m, max_keys, min_keys) in bounds {
            let order = Order::try_from(m).unwrap();
            assert_eq!(order.max_keys(), max_keys, "max_keys for m={m}");
            assert_eq!(order.min_keys(), min_keys, "min_keys for m={m}");
        }
    }

    proptest! {
        // A split of `m` keys leaves `m/2` on the left and `m - m/2 - 1` on the
        // right; both halves must satisfy the minimum, and a merge of two
        // minimal siblings plus a separator must fit.
        #[test]
        fn split_and_merge_respect_bounds(m in Order::MIN..1024usize) {
            let order = Order::new(m).unwrap();
            let left = m / 2;
            let right = m - left - 1;
            prop_assert!(left >= order.min_keys());
            prop_assert!(right >= order.min_keys());
            prop_assert!(2 * order.min_keys() <= order.max_keys());
        }
    }
}
