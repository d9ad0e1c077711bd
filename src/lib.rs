//! Indexed Heap for Rust
//!
//! This crate provides an addressable binary heap: a min-heap of `(key, value)`
//! pairs with a hash index from key to tree position, so that any element can
//! be found, updated, or removed by key, not only the minimum.
//!
//! # Features
//!
//! - **Indexed Heap**: O(log n) insert, extract-min, and erase by key; O(1) min, lookup, and membership
//! - **Pluggable order**: ascending ([`order::Natural`]), descending ([`order::Reversed`]), or a closure ([`order::ByFn`])
//! - **Rendering**: a level-by-level text layout of the underlying tree via [`std::fmt::Display`]
//! - **Protocol**: a line-oriented command session driving any [`AddressableHeap`] (see [`protocol`])
//!
//! # Example
//!
//! ```rust
//! use indexed_heap::{HeapError, IndexedHeap};
//!
//! let mut heap = IndexedHeap::new();
//! heap.insert(8, "eight").unwrap();
//! heap.insert(3, "three").unwrap();
//! heap.insert(5, "five").unwrap();
//!
//! assert_eq!(heap.min().unwrap().0.key, 3);
//! assert_eq!(heap.max().unwrap().0.key, 8);
//! assert_eq!(heap.insert(3, "again"), Err(HeapError::DuplicateKey));
//!
//! heap.erase(&5).unwrap();
//! assert_eq!(heap.to_string(), "[3 three]\n[8 eight 3] _");
//! ```

pub mod indexed;
pub mod order;
pub mod protocol;
pub mod render;
pub mod traits;

// Re-export the main types for convenience
pub use indexed::{Entry, IndexedHeap, InvariantViolation};
pub use traits::{AddressableHeap, HeapError};
