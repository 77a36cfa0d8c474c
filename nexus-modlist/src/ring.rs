//! Sentinel-anchored circular doubly-linked list over slab storage.
//!
//! The ring owns a [`NodeSlab`] whose slot 0 is the sentinel: a node with no
//! value whose links close the sequence into a circle. With the sentinel
//! always present there is no head/tail special casing:
//!
//! ```text
//!        ┌──────────────────────────────────────────┐
//!        ▼                                          │
//!   [sentinel] ⇄ [a] ⇄ [b] ⇄ [c] ─────── next ──────┘
//!
//!   empty:       sentinel.next == sentinel
//!   push_back:   link before the sentinel
//!   front/back:  sentinel.next / sentinel.prev
//! ```
//!
//! # Invariants
//!
//! - Following `next` from the sentinel visits every live node exactly once
//!   and returns to the sentinel; `prev` does the same in reverse.
//! - For every node `n`: `n.next.prev == n` and `n.prev.next == n`.
//! - `len()` equals the number of live non-sentinel nodes.
//! - A slot is released only after its node has been unlinked.
//!
//! The ring is not synchronized; [`ModList`](crate::ModList) wraps it in a
//! reader-writer lock.
//!
//! # Example
//!
//! ```
//! use nexus_modlist::Ring;
//!
//! let mut ring: Ring<i64> = Ring::new(None);
//! ring.push_back(1).unwrap();
//! ring.push_back(2).unwrap();
//! ring.push_back(1).unwrap();
//!
//! // Removes the earliest match only
//! assert_eq!(ring.remove(&1), Some(1));
//! assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 1]);
//!
//! assert_eq!(ring.clear(), 2);
//! assert!(ring.is_empty());
//! ```

use std::fmt;

use crate::storage::{Full, NodeSlab};
use crate::NodeKey;

/// A node in the ring. The sentinel is the only node without a value.
struct Node<V> {
    value: Option<V>,
    prev: NodeKey,
    next: NodeKey,
}

impl<V> Node<V> {
    #[inline]
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: NodeKey::SENTINEL,
            next: NodeKey::SENTINEL,
        }
    }
}

/// Sentinel-anchored circular doubly-linked list.
///
/// Values are kept in insertion order. Lookup is a linear scan by equality.
pub struct Ring<V> {
    nodes: NodeSlab<Node<V>>,
    len: usize,
    generation: u64,
}

impl<V> Ring<V> {
    /// Creates an empty ring holding only the sentinel.
    ///
    /// `capacity` bounds the number of values; `None` grows freely.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            nodes: NodeSlab::with_root(Node::sentinel(), capacity.map(|c| c.saturating_add(1))),
            len: 0,
            generation: 0,
        }
    }

    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sentinel links to itself.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes[NodeKey::SENTINEL].next.is_sentinel()
    }

    /// Returns the value capacity, if bounded.
    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.nodes.limit().map(|limit| limit - 1)
    }

    /// Returns a counter bumped by every structural change.
    ///
    /// A key observed at generation `g` still names the same node, at the
    /// same position, as long as the generation is still `g`.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Appends a value at the tail (immediately before the sentinel).
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the ring is at capacity. The ring is
    /// left unchanged.
    pub fn push_back(&mut self, value: V) -> Result<NodeKey, Full<V>> {
        if self.nodes.is_full() {
            return Err(Full(value));
        }

        let tail = self.nodes[NodeKey::SENTINEL].prev;
        let key = match self.nodes.try_insert(Node {
            value: Some(value),
            prev: tail,
            next: NodeKey::SENTINEL,
        }) {
            Ok(key) => key,
            Err(Full(node)) => return Err(Full(Self::into_value(node))),
        };

        self.nodes[tail].next = key;
        self.nodes[NodeKey::SENTINEL].prev = key;

        self.len += 1;
        self.generation += 1;
        Ok(key)
    }

    /// Removes the earliest occurrence of `value`.
    ///
    /// Returns `None`, leaving the ring untouched, if `value` is absent.
    pub fn remove(&mut self, value: &V) -> Option<V>
    where
        V: PartialEq,
    {
        let key = self.find(value)?;
        self.remove_key(key)
    }

    /// Unlinks and releases the node at `key`.
    ///
    /// Returns `None` for the sentinel or a key with no live node.
    pub fn remove_key(&mut self, key: NodeKey) -> Option<V> {
        if key.is_sentinel() || !self.nodes.contains(key) {
            return None;
        }

        let (prev, next) = {
            let node = &self.nodes[key];
            (node.prev, node.next)
        };
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        self.len -= 1;
        self.generation += 1;

        // Fully unlinked; safe to release
        self.nodes.remove(key).map(Self::into_value)
    }

    /// Unlinks and releases every value, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.len;

        let mut key = self.nodes[NodeKey::SENTINEL].next;
        while !key.is_sentinel() {
            let next = self.nodes[key].next;
            self.nodes.remove(key);
            key = next;
        }

        let sentinel = &mut self.nodes[NodeKey::SENTINEL];
        sentinel.next = NodeKey::SENTINEL;
        sentinel.prev = NodeKey::SENTINEL;

        self.len = 0;
        self.generation += 1;
        removed
    }

    // ========================================================================
    // Lookup & navigation
    // ========================================================================

    /// Returns the key of the earliest node equal to `value`.
    pub fn find(&self, value: &V) -> Option<NodeKey>
    where
        V: PartialEq,
    {
        self.keys().find(|&key| self.get(key) == Some(value))
    }

    /// Returns the value at `key`, or `None` for the sentinel or a dead key.
    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&V> {
        self.nodes.get(key)?.value.as_ref()
    }

    /// Returns the key of the node at 1-based `position`.
    ///
    /// Walks `position` steps forward from the sentinel. Returns `None` for
    /// position 0 or a position past the tail.
    pub fn nth(&self, position: usize) -> Option<NodeKey> {
        if position == 0 || position > self.len {
            return None;
        }
        self.keys().nth(position - 1)
    }

    /// Returns the key following `key`, or `None` at the tail.
    #[inline]
    pub fn next_key(&self, key: NodeKey) -> Option<NodeKey> {
        let next = self.nodes.get(key)?.next;
        if next.is_sentinel() { None } else { Some(next) }
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over values, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { keys: self.keys() }
    }

    /// Returns an iterator over keys, front to back.
    #[inline]
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            ring: self,
            current: self.nodes[NodeKey::SENTINEL].next,
            remaining: self.len,
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Checks every structural invariant of the ring.
    ///
    /// Walks the ring in both directions and verifies that neighbor links
    /// agree, that the walk closes at the sentinel, and that the number of
    /// nodes seen matches `len()` and the occupied slot count.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0usize;
        let mut key = NodeKey::SENTINEL;

        loop {
            let Some(node) = self.nodes.get(key) else {
                return false;
            };
            match self.nodes.get(node.next) {
                Some(next) if next.prev == key => {}
                _ => return false,
            }
            if node.value.is_none() != key.is_sentinel() {
                return false;
            }

            key = node.next;
            if key.is_sentinel() {
                break;
            }
            seen += 1;
            if seen > self.len {
                return false;
            }
        }

        seen == self.len && self.nodes.len() == self.len + 1
    }

    #[inline]
    fn into_value(node: Node<V>) -> V {
        match node.value {
            Some(value) => value,
            // Only slot 0 holds no value and it is never released
            None => unreachable!("sentinel released"),
        }
    }
}

impl<V> Default for Ring<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<V: fmt::Debug> fmt::Debug for Ring<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over keys in a [`Ring`], front to back.
pub struct Keys<'a, V> {
    ring: &'a Ring<V>,
    current: NodeKey,
    remaining: usize,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = NodeKey;

    #[inline]
    fn next(&mut self) -> Option<NodeKey> {
        if self.current.is_sentinel() {
            return None;
        }
        let key = self.current;
        self.current = self.ring.nodes[key].next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// Iterator over values in a [`Ring`], front to back.
pub struct Iter<'a, V> {
    keys: Keys<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        let ring = self.keys.ring;
        let key = self.keys.next()?;
        ring.get(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a Ring<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}
