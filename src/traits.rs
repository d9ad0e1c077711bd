//! Common traits for addressable heaps
//!
//! This module provides the error type shared by every heap operation and the
//! [`AddressableHeap`] trait: a priority container whose elements can be
//! reached by key, not only through the minimum.
//!
//! The protocol [`Session`](crate::protocol::Session) is written against the
//! trait, so any structure offering the same surface can sit behind it.

use std::fmt;

use crate::indexed::Entry;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The key is already stored in the heap
    DuplicateKey,
    /// The operation needs at least one element
    EmptyHeap,
    /// No element with the requested key is stored in the heap
    KeyNotFound,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::DuplicateKey => write!(f, "key is already present in the heap"),
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::KeyNotFound => write!(f, "key is not present in the heap"),
        }
    }
}

impl std::error::Error for HeapError {}

/// Priority container with key-based access
///
/// Elements are `(key, value)` pairs ordered by key. Keys are unique; the value
/// is payload and never influences ordering. Besides the usual minimum
/// operations, any element can be read, updated, or removed through its key.
///
/// Positions returned by the operations are storage positions in the
/// underlying complete binary tree (root at 0). They are only stable until the
/// next structural mutation.
///
/// # Example
///
/// ```rust
/// use indexed_heap::{AddressableHeap, HeapError, IndexedHeap};
///
/// fn drain_keys<H: AddressableHeap<i32, &'static str>>(heap: &mut H) -> Vec<i32> {
///     let mut keys = Vec::new();
///     while let Ok(entry) = heap.extract_min() {
///         keys.push(entry.key);
///     }
///     keys
/// }
///
/// let mut heap = IndexedHeap::new();
/// heap.insert(3, "three").unwrap();
/// heap.insert(1, "one").unwrap();
/// assert_eq!(heap.insert(1, "uno"), Err(HeapError::DuplicateKey));
/// assert_eq!(drain_keys(&mut heap), vec![1, 3]);
/// ```
pub trait AddressableHeap<K, V> {
    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a new element and returns the position it settled at
    ///
    /// # Errors
    /// Returns `HeapError::DuplicateKey` if `key` is already stored; the heap
    /// is left untouched.
    ///
    /// # Time Complexity
    /// O(log n)
    fn insert(&mut self, key: K, value: V) -> Result<usize, HeapError>;

    /// Returns the element at the root and its position (always 0)
    ///
    /// # Time Complexity
    /// O(1)
    fn min(&self) -> Result<(&Entry<K, V>, usize), HeapError>;

    /// Returns the element with the largest key and its position
    ///
    /// # Time Complexity
    /// O(n): only the leaves are scanned, which is still half the heap.
    fn max(&self) -> Result<(&Entry<K, V>, usize), HeapError>;

    /// Returns the value stored under `key`
    fn at(&self, key: &K) -> Result<&V, HeapError>;

    /// Returns mutable access to the value stored under `key`
    ///
    /// The element is not moved: ordering depends on keys only.
    fn at_mut(&mut self, key: &K) -> Result<&mut V, HeapError>;

    /// Returns a copy of the element stored under `key` and its position
    fn find(&self, key: &K) -> Result<(Entry<K, V>, usize), HeapError>
    where
        V: Clone;

    /// Returns true if an element with `key` is stored
    fn contains_key(&self, key: &K) -> bool;

    /// Removes and returns the element at the root
    ///
    /// # Time Complexity
    /// O(log n)
    fn extract_min(&mut self) -> Result<Entry<K, V>, HeapError>;

    /// Removes and returns the element stored under `key`
    ///
    /// # Time Complexity
    /// O(log n)
    fn erase(&mut self, key: &K) -> Result<Entry<K, V>, HeapError>;
}
