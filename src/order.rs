//! Order relations over heap keys
//!
//! An [`IndexedHeap`](crate::IndexedHeap) never compares keys with `<` directly.
//! Every ordering decision goes through a [`KeyOrder`] value captured when the
//! heap is built, so the same structure serves as a min-heap ([`Natural`]),
//! a max-heap ([`Reversed`]), or any custom arrangement ([`ByFn`]).
//!
//! The relation must be a strict weak ordering: irreflexive, transitive, and
//! with transitive incomparability. Anything else leaves the heap order
//! undefined (the structure stays memory safe, but `min` may lie).
//!
//! # Example
//!
//! ```rust
//! use indexed_heap::IndexedHeap;
//! use indexed_heap::order::ByFn;
//!
//! // Order strings by length, shortest first
//! let by_len = ByFn::new(|a: &String, b: &String| a.len() < b.len());
//! let mut heap = IndexedHeap::with_order(by_len);
//! heap.insert("three".to_string(), 3).unwrap();
//! heap.insert("one".to_string(), 1).unwrap();
//!
//! let (entry, _) = heap.min().unwrap();
//! assert_eq!(entry.key, "one");
//! ```

use std::fmt;

/// Strict weak ordering over keys
///
/// `precedes(a, b)` returns true when `a` must sit closer to the root than `b`.
pub trait KeyOrder<K: ?Sized> {
    /// Returns true if `a` strictly precedes `b`
    fn precedes(&self, a: &K, b: &K) -> bool;
}

/// Ascending order given by [`Ord`]; the root holds the smallest key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> KeyOrder<K> for Natural {
    #[inline]
    fn precedes(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Descending order given by [`Ord`]; the root holds the largest key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed;

impl<K: Ord + ?Sized> KeyOrder<K> for Reversed {
    #[inline]
    fn precedes(&self, a: &K, b: &K) -> bool {
        b < a
    }
}

/// Order defined by a "less than" closure
///
/// Wraps any `Fn(&K, &K) -> bool`. The closure is called with the candidate
/// first, so `|a, b| a < b` reproduces [`Natural`].
#[derive(Clone, Copy)]
pub struct ByFn<F>(F);

impl<F> ByFn<F> {
    /// Wraps a comparison closure
    pub fn new(less: F) -> Self {
        ByFn(less)
    }
}

impl<F> fmt::Debug for ByFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByFn").field(&"<closure>").finish()
    }
}

impl<K: ?Sized, F> KeyOrder<K> for ByFn<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn precedes(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}
