//! Indexed Binary Heap implementation
//!
//! A binary heap over `(key, value)` entries paired with a hash index from key
//! to storage position. The index turns the heap into an addressable priority
//! container: any element can be located, updated, or removed through its key,
//! not only the minimum.
//!
//! The entries live in a `Vec` laid out as a complete binary tree (root at 0,
//! children of `i` at `2i + 1` and `2i + 2`). Every swap inside the tree also
//! rewrites the index entries of both participants, so after each public call:
//!
//! - `storage[index[k]].key == k` for every stored key, and the two have equal length
//! - no entry's key precedes its parent's key under the heap's [`KeyOrder`]
//!
//! Ordering is defined over keys only. Values may be changed in place through
//! [`IndexedHeap::at_mut`] without touching the tree.
//!
//! # Time Complexity
//!
//! | Operation       | Complexity |
//! |-----------------|------------|
//! | `insert`        | O(log n)   |
//! | `min`           | O(1)       |
//! | `max`           | O(n)       |
//! | `at` / `at_mut` | O(1)       |
//! | `find`          | O(1)       |
//! | `contains_key`  | O(1)       |
//! | `extract_min`   | O(log n)   |
//! | `erase`         | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use indexed_heap::IndexedHeap;
//!
//! let mut heap = IndexedHeap::new();
//! heap.insert(10, "ten").unwrap();
//! heap.insert(-1, "minus one").unwrap();
//! heap.insert(1, "one").unwrap();
//!
//! *heap.at_mut(&1).unwrap() = "uno";
//! heap.erase(&10).unwrap();
//!
//! assert_eq!(heap.extract_min().unwrap().into_pair(), (-1, "minus one"));
//! assert_eq!(heap.extract_min().unwrap().into_pair(), (1, "uno"));
//! assert!(heap.is_empty());
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::order::{KeyOrder, Natural};
use crate::traits::{AddressableHeap, HeapError};

/// A `(key, value)` pair stored in the heap
///
/// The heap never hands out mutable access to a stored key; only the value
/// can be changed after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Splits the entry into its key and value
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// A broken structural invariant, reported by [`IndexedHeap::check_invariants`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Storage and index hold a different number of entries
    SizeMismatch { storage: usize, index: usize },
    /// The key at `position` is missing from the index or indexed elsewhere
    IndexMismatch { position: usize },
    /// The key at `child` precedes the key at its `parent`
    HeapOrder { child: usize, parent: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::SizeMismatch { storage, index } => {
                write!(f, "storage holds {storage} entries but index holds {index}")
            }
            InvariantViolation::IndexMismatch { position } => {
                write!(f, "index does not point back to position {position}")
            }
            InvariantViolation::HeapOrder { child, parent } => {
                write!(f, "entry at {child} precedes its parent at {parent}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Position of the parent of `position`; the root has none
#[inline]
pub(crate) fn parent(position: usize) -> usize {
    debug_assert!(position > 0, "the root has no parent");
    (position - 1) / 2
}

#[inline]
fn left(position: usize) -> usize {
    2 * position + 1
}

#[inline]
fn right(position: usize) -> usize {
    2 * position + 2
}

/// An addressable binary heap
///
/// `K` must be hashable for the index and is ordered by `O`, which defaults to
/// [`Natural`] (smallest key at the root). Keys are unique.
#[derive(Debug, Clone)]
pub struct IndexedHeap<K, V, O = Natural> {
    /// Entries laid out as a complete binary tree
    storage: Vec<Entry<K, V>>,
    /// Key -> position in `storage`
    index: FxHashMap<K, usize>,
    order: O,
}

impl<K, V> IndexedHeap<K, V, Natural> {
    /// Creates an empty min-heap ordered by [`Ord`]
    pub fn new() -> Self {
        Self::with_order(Natural)
    }

    /// Creates an empty min-heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, Natural)
    }
}

impl<K, V, O> IndexedHeap<K, V, O> {
    /// Creates an empty heap ordered by `order`
    pub fn with_order(order: O) -> Self {
        Self {
            storage: Vec::new(),
            index: FxHashMap::default(),
            order,
        }
    }

    /// Creates an empty heap ordered by `order` with room for `capacity` entries
    pub fn with_capacity_and_order(capacity: usize, order: O) -> Self {
        let index = FxHashMap::with_capacity_and_hasher(capacity, Default::default());
        Self {
            storage: Vec::with_capacity(capacity),
            index,
            order,
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the order relation the heap was built with
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns the entries in storage order (level by level from the root)
    pub fn as_slice(&self) -> &[Entry<K, V>] {
        &self.storage
    }

    /// Iterates over the entries in storage order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.storage.iter()
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.storage.clear();
        self.index.clear();
    }
}

impl<K, V, O> IndexedHeap<K, V, O>
where
    K: Hash + Eq + Clone,
    O: KeyOrder<K>,
{
    /// Inserts `(key, value)` and returns the position it settled at
    ///
    /// # Errors
    /// `HeapError::DuplicateKey` if `key` is already stored. The heap is not modified.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize, HeapError> {
        if self.index.contains_key(&key) {
            return Err(HeapError::DuplicateKey);
        }

        let position = self.storage.len();
        self.index.insert(key.clone(), position);
        self.storage.push(Entry { key, value });
        Ok(self.sift_up(position))
    }

    /// Returns the root entry and its position, which is always 0
    pub fn min(&self) -> Result<(&Entry<K, V>, usize), HeapError> {
        self.storage
            .first()
            .map(|entry| (entry, 0))
            .ok_or(HeapError::EmptyHeap)
    }

    /// Returns the entry with the largest key and its position
    ///
    /// No internal node can be strictly larger than all of its children, so the
    /// scan covers the leaves only, walking back from the last position. When
    /// several leaves tie, the one scanned first (the highest position) wins.
    pub fn max(&self) -> Result<(&Entry<K, V>, usize), HeapError> {
        let last = self.storage.len().checked_sub(1).ok_or(HeapError::EmptyHeap)?;
        let first_leaf = if last == 0 { 0 } else { parent(last) + 1 };

        let mut best = last;
        for position in (first_leaf..last).rev() {
            if self
                .order
                .precedes(&self.storage[best].key, &self.storage[position].key)
            {
                best = position;
            }
        }
        Ok((&self.storage[best], best))
    }

    /// Returns the current position of `key`, if stored
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Returns true if an element with `key` is stored
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the value stored under `key`
    pub fn at<Q>(&self, key: &Q) -> Result<&V, HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.position(key).ok_or(HeapError::KeyNotFound)?;
        Ok(&self.storage[position].value)
    }

    /// Returns mutable access to the value stored under `key`
    ///
    /// The entry keeps its position: values take no part in ordering, so
    /// nothing is re-validated after the borrow ends.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.position(key).ok_or(HeapError::KeyNotFound)?;
        Ok(&mut self.storage[position].value)
    }

    /// Returns a copy of the entry stored under `key` together with its position
    pub fn find<Q>(&self, key: &Q) -> Result<(Entry<K, V>, usize), HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let position = self.position(key).ok_or(HeapError::KeyNotFound)?;
        Ok((self.storage[position].clone(), position))
    }

    /// Removes and returns the root entry
    pub fn extract_min(&mut self) -> Result<Entry<K, V>, HeapError> {
        if self.storage.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        Ok(self.remove_at(0))
    }

    /// Removes and returns the entry stored under `key`
    ///
    /// Once erased, the key is free to be inserted again.
    pub fn erase<Q>(&mut self, key: &Q) -> Result<Entry<K, V>, HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.position(key).ok_or(HeapError::KeyNotFound)?;
        Ok(self.remove_at(position))
    }

    /// Verifies the index bijection and the heap order
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.storage.len() != self.index.len() {
            return Err(InvariantViolation::SizeMismatch {
                storage: self.storage.len(),
                index: self.index.len(),
            });
        }

        for (position, entry) in self.storage.iter().enumerate() {
            if self.index.get(&entry.key) != Some(&position) {
                return Err(InvariantViolation::IndexMismatch { position });
            }
            if position > 0 {
                let up = parent(position);
                if self.order.precedes(&entry.key, &self.storage[up].key) {
                    return Err(InvariantViolation::HeapOrder {
                        child: position,
                        parent: up,
                    });
                }
            }
        }
        Ok(())
    }

    /// Removes the entry at `position`, filling the hole with the last entry
    fn remove_at(&mut self, position: usize) -> Entry<K, V> {
        let removed = self.storage.swap_remove(position);
        self.index.remove(&removed.key);

        if position < self.storage.len() {
            self.reindex(position);
            self.restore(position);
        }
        removed
    }

    /// Repairs heap order around an entry that was just moved into `position`
    ///
    /// Checks downward first, then upward from wherever the entry settled.
    /// Only one of the two directions can actually move it.
    fn restore(&mut self, position: usize) -> usize {
        let settled = self.sift_down(position);
        self.sift_up(settled)
    }

    /// Move entry at position up while it precedes its parent
    fn sift_up(&mut self, mut position: usize) -> usize {
        while position > 0 {
            let up = parent(position);
            if !self
                .order
                .precedes(&self.storage[position].key, &self.storage[up].key)
            {
                break;
            }
            self.swap_entries(position, up);
            position = up;
        }
        position
    }

    /// Move entry at position down while one of its children precedes it
    fn sift_down(&mut self, mut position: usize) -> usize {
        let len = self.storage.len();
        loop {
            let mut smallest = position;
            for child in [left(position), right(position)] {
                if child < len
                    && self
                        .order
                        .precedes(&self.storage[child].key, &self.storage[smallest].key)
                {
                    smallest = child;
                }
            }

            if smallest == position {
                return position;
            }
            self.swap_entries(position, smallest);
            position = smallest;
        }
    }

    /// Swaps two entries and points the index at their new positions
    fn swap_entries(&mut self, a: usize, b: usize) {
        self.storage.swap(a, b);
        self.reindex(a);
        self.reindex(b);
    }

    /// Points the index entry of the key stored at `position` back at it
    fn reindex(&mut self, position: usize) {
        match self.index.get_mut(&self.storage[position].key) {
            Some(slot) => *slot = position,
            None => debug_assert!(false, "stored key at {position} is missing from the index"),
        }
    }
}

impl<K, V, O: Default> Default for IndexedHeap<K, V, O> {
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<'a, K, V, O> IntoIterator for &'a IndexedHeap<K, V, O> {
    type Item = &'a Entry<K, V>;
    type IntoIter = std::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}

impl<K, V, O> AddressableHeap<K, V> for IndexedHeap<K, V, O>
where
    K: Hash + Eq + Clone,
    O: KeyOrder<K>,
{
    fn len(&self) -> usize {
        IndexedHeap::len(self)
    }

    fn is_empty(&self) -> bool {
        IndexedHeap::is_empty(self)
    }

    fn insert(&mut self, key: K, value: V) -> Result<usize, HeapError> {
        IndexedHeap::insert(self, key, value)
    }

    fn min(&self) -> Result<(&Entry<K, V>, usize), HeapError> {
        IndexedHeap::min(self)
    }

    fn max(&self) -> Result<(&Entry<K, V>, usize), HeapError> {
        IndexedHeap::max(self)
    }

    fn at(&self, key: &K) -> Result<&V, HeapError> {
        IndexedHeap::at(self, key)
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, HeapError> {
        IndexedHeap::at_mut(self, key)
    }

    fn find(&self, key: &K) -> Result<(Entry<K, V>, usize), HeapError>
    where
        V: Clone,
    {
        IndexedHeap::find(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        IndexedHeap::contains_key(self, key)
    }

    fn extract_min(&mut self) -> Result<Entry<K, V>, HeapError> {
        IndexedHeap::extract_min(self)
    }

    fn erase(&mut self, key: &K) -> Result<Entry<K, V>, HeapError> {
        IndexedHeap::erase(self, key)
    }
}
