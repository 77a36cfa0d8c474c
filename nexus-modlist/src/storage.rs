//! Slab storage with stable keys and an optional node limit.
//!
//! [`NodeSlab`] wraps `slab::Slab` and adds the one thing the ring needs that
//! the slab does not provide: a hard ceiling on the number of occupied slots.
//! Hitting the ceiling is how the store reports an allocation failure; the
//! rejected value is handed back inside [`Full`] so nothing is lost.

use std::fmt;

use crate::NodeKey;

/// Error returned when the storage has reached its node limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Growable slab with an optional ceiling on occupied slots.
///
/// The first value inserted is the root and lands in slot 0. The root counts
/// against the limit like any other slot.
pub struct NodeSlab<T> {
    slots: slab::Slab<T>,
    limit: Option<usize>,
}

impl<T> NodeSlab<T> {
    /// Creates storage holding only `root`, in slot 0.
    ///
    /// `limit` bounds the total number of occupied slots, root included.
    /// A limit of 0 is treated as 1 since the root is always present.
    pub fn with_root(root: T, limit: Option<usize>) -> Self {
        let mut slots = slab::Slab::with_capacity(limit.map_or(16, |l| l.clamp(1, 1024)));
        let key = slots.insert(root);
        debug_assert_eq!(key, NodeKey::SENTINEL.as_usize());

        Self {
            slots,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Returns the number of occupied slots, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if only the root is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }

    /// Returns the slot limit, if any.
    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` if another insert would exceed the limit.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.slots.len() >= limit)
    }

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the limit is reached.
    #[inline]
    pub fn try_insert(&mut self, value: T) -> Result<NodeKey, Full<T>> {
        if self.is_full() {
            return Err(Full(value));
        }
        Ok(NodeKey::from_usize(self.slots.insert(value)))
    }

    /// Removes and returns the value at `key`, if present.
    ///
    /// The root cannot be removed.
    #[inline]
    pub fn remove(&mut self, key: NodeKey) -> Option<T> {
        if key.is_sentinel() {
            return None;
        }
        self.slots.try_remove(key.as_usize())
    }

    /// Returns a reference to the value at `key`, if present.
    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.slots.get(key.as_usize())
    }

    /// Returns `true` if `key` names an occupied slot.
    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.slots.contains(key.as_usize())
    }
}

impl<T> std::ops::Index<NodeKey> for NodeSlab<T> {
    type Output = T;

    #[inline]
    fn index(&self, key: NodeKey) -> &T {
        &self.slots[key.as_usize()]
    }
}

impl<T> std::ops::IndexMut<NodeKey> for NodeSlab<T> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut T {
        &mut self.slots[key.as_usize()]
    }
}

impl<T> fmt::Debug for NodeSlab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSlab")
            .field("len", &self.slots.len())
            .field("limit", &self.limit)
            .finish()
    }
}
