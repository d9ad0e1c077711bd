//! Level-by-level text rendering of an [`IndexedHeap`]
//!
//! The heap is printed as the complete binary tree it encodes, one line per
//! level, root first:
//!
//! - the root is written as `[key value]`
//! - every other entry as `[key value parent-key]`
//! - empty slots of the last level as `_`
//!
//! Entries on a level are separated by a single space and levels by `\n`,
//! without a trailing newline. An empty heap renders as `_`.
//!
//! ```rust
//! use indexed_heap::IndexedHeap;
//!
//! let mut heap = IndexedHeap::new();
//! for (key, value) in [(2, "b"), (1, "a"), (3, "c"), (4, "d")] {
//!     heap.insert(key, value).unwrap();
//! }
//! assert_eq!(heap.to_string(), "[1 a]\n[2 b 1] [3 c 1]\n[4 d 2] _ _ _");
//! ```

use std::fmt;

use crate::indexed::{parent, IndexedHeap};

/// Symbol printed for a slot with no entry
pub const PLACEHOLDER: &str = "_";

impl<K, V, O> fmt::Display for IndexedHeap<K, V, O>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.as_slice();
        let Some(root) = entries.first() else {
            return f.write_str(PLACEHOLDER);
        };
        write!(f, "[{} {}]", root.key, root.value)?;

        // A level is printed whenever its first slot is occupied
        let mut position = 1;
        let mut width = 2;
        while width <= entries.len() {
            f.write_str("\n")?;
            for slot in 0..width {
                if slot > 0 {
                    f.write_str(" ")?;
                }
                match entries.get(position) {
                    Some(entry) => write!(
                        f,
                        "[{} {} {}]",
                        entry.key,
                        entry.value,
                        entries[parent(position)].key
                    )?,
                    None => f.write_str(PLACEHOLDER)?,
                }
                position += 1;
            }
            width *= 2;
        }
        Ok(())
    }
}
