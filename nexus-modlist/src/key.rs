//! Stable node keys.
//!
//! Nodes live in slab storage and refer to each other by slot index rather
//! than by pointer. Slot 0 is reserved for the sentinel, which is created
//! with the store and never released, so a key equal to [`NodeKey::SENTINEL`]
//! doubles as the "end of sequence" marker in both directions.

/// Index of a node in the store's slab.
///
/// Keys stay valid until the node they name is removed. A key that outlives
/// its node may later name a different node once the slot is reused; callers
/// that hold a key across lock releases must validate it (see
/// [`Ring::generation`](crate::ring::Ring::generation)).
///
/// # Example
///
/// ```
/// use nexus_modlist::NodeKey;
///
/// assert!(NodeKey::SENTINEL.is_sentinel());
/// assert_eq!(NodeKey::SENTINEL.as_usize(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    /// Key of the permanent sentinel node.
    pub const SENTINEL: Self = NodeKey(0);

    #[inline]
    pub(crate) const fn from_usize(val: usize) -> Self {
        NodeKey(val)
    }

    /// Returns the key as a slab index.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns `true` if this key names the sentinel.
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }
}
