use std::fmt;
use std::hash::Hash;

/// Bound on the item labels a tree can hold.
///
/// Labels are opaque: the tree identifies them by equality and hashing only.
/// `Display` is required so that errors can name the offending label. Any
/// type meeting the bounds is a label; the usual choices are `&str`,
/// `String`, or small integers.
pub trait Label: Clone + Eq + Hash + fmt::Display {}

impl<T: Clone + Eq + Hash + fmt::Display> Label for T {}

/// Dense 1-based frequency rank of an item, assigned at tree construction.
/// Smaller rank means more frequent; ranks impose the total order used to
/// sort transactions before insertion.
#[derive(Copy, Clone, Hash, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub(crate) struct Rank {
    id: u32,
}

impl Rank {
    pub(crate) fn with_id(id: u32) -> Rank {
        debug_assert!(id > 0);
        Rank { id }
    }

    /// Zero-based position in rank-indexed tables.
    pub(crate) fn as_index(self) -> usize {
        (self.id - 1) as usize
    }
}
