use core::num::NonZero;

// Unit tests keep slots narrow so the niche and bounds checks are exercised cheaply.
#[cfg(test)]
type Slot = u16;
#[cfg(not(test))]
type Slot = u32;

/// A non-owning reference to a node slot in an [`Arena`](super::arena::Arena).
///
/// Stored off-by-one in a `NonZero` so that `Option<Handle>` (used for parent
/// links) costs no extra space.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Slot>);

impl Handle {
    /// The largest slot index a handle can address.
    pub(crate) const MAX: usize = (Slot::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let slot = (index + 1) as Slot;
        match NonZero::new(slot) {
            Some(slot) => Self(slot),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Parent links are `Option<Handle>`; they must stay as small as a bare slot.
    assert_eq_size!(Option<Handle>, Slot);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn rejects_out_of_range_index() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn first_slot_is_index_zero() {
        assert_eq!(Handle::from_index(0).index(), 0);
        assert_ne!(Handle::from_index(0), Handle::from_index(1));
    }

    proptest! {
        #[test]
        fn index_survives_handle(index in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::from_index(index).index(), index);
        }
    }
}
