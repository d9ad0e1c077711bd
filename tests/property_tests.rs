//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations, replay them against
//! both an IndexedHeap and a plain map, and verify after every step that the
//! heap invariants hold and every query agrees with a brute-force answer.

use proptest::prelude::*;
use proptest::sample::Index;
use indexed_heap::order::{KeyOrder, Natural, Reversed};
use indexed_heap::{HeapError, IndexedHeap};

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, i32),
    Erase(i32),
    ExtractMin,
    Set(i32, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-50i32..50, any::<i32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        2 => (-50i32..50).prop_map(Op::Erase),
        1 => Just(Op::ExtractMin),
        1 => (-50i32..50, any::<i32>()).prop_map(|(key, value)| Op::Set(key, value)),
    ]
}

/// Key that no other key precedes, by linear scan
fn brute_force_min<'a, O: KeyOrder<i32>>(
    order: &O,
    keys: impl Iterator<Item = &'a i32>,
) -> Option<i32> {
    keys.copied().fold(None, |best, key| match best {
        Some(b) if !order.precedes(&key, &b) => Some(b),
        _ => Some(key),
    })
}

/// Key that precedes no other key, by linear scan
fn brute_force_max<'a, O: KeyOrder<i32>>(
    order: &O,
    keys: impl Iterator<Item = &'a i32>,
) -> Option<i32> {
    keys.copied().fold(None, |best, key| match best {
        Some(b) if !order.precedes(&b, &key) => Some(b),
        _ => Some(key),
    })
}

/// Check every observable property of the heap against the model
fn check_state<O: KeyOrder<i32>>(
    heap: &IndexedHeap<i32, i32, O>,
    model: &BTreeMap<i32, i32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(heap.check_invariants(), Ok(()));
    prop_assert_eq!(heap.len(), model.len());
    prop_assert_eq!(heap.is_empty(), model.is_empty());

    for (key, value) in model {
        prop_assert!(heap.contains_key(key));
        let (entry, position) = heap.find(key).unwrap();
        prop_assert_eq!(entry.value, *value);
        prop_assert_eq!(heap.position(key), Some(position));
        prop_assert_eq!(heap.as_slice()[position].key, *key);
    }

    let expected_min = brute_force_min(heap.order(), model.keys());
    prop_assert_eq!(heap.min().ok().map(|(entry, _)| entry.key), expected_min);

    let expected_max = brute_force_max(heap.order(), model.keys());
    let max = heap.max().ok();
    prop_assert_eq!(max.map(|(entry, _)| entry.key), expected_max);
    if let Some((entry, position)) = max {
        prop_assert_eq!(heap.position(&entry.key), Some(position));
    }

    Ok(())
}

/// Replay `ops` against a heap and a map, checking agreement after each step
fn test_operations_against_model<O: KeyOrder<i32>>(
    order: O,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut heap = IndexedHeap::with_order(order);
    let mut model = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                if model.contains_key(&key) {
                    let before = heap.as_slice().to_vec();
                    prop_assert_eq!(heap.insert(key, value), Err(HeapError::DuplicateKey));
                    prop_assert_eq!(heap.as_slice(), before.as_slice());
                } else {
                    let position = heap.insert(key, value).unwrap();
                    prop_assert_eq!(heap.position(&key), Some(position));
                    model.insert(key, value);
                }
            }
            Op::Erase(key) => match model.remove(&key) {
                Some(value) => {
                    let entry = heap.erase(&key).unwrap();
                    prop_assert_eq!((entry.key, entry.value), (key, value));
                    prop_assert!(!heap.contains_key(&key));
                }
                None => prop_assert_eq!(heap.erase(&key), Err(HeapError::KeyNotFound)),
            },
            Op::ExtractMin => {
                match brute_force_min(heap.order(), model.keys()) {
                    Some(expected) => {
                        let entry = heap.extract_min().unwrap();
                        prop_assert_eq!(entry.key, expected);
                        prop_assert_eq!(Some(entry.value), model.remove(&expected));
                    }
                    None => prop_assert_eq!(heap.extract_min(), Err(HeapError::EmptyHeap)),
                }
            }
            Op::Set(key, value) => {
                if model.contains_key(&key) {
                    let layout: Vec<i32> = heap.iter().map(|entry| entry.key).collect();
                    *heap.at_mut(&key).unwrap() = value;
                    prop_assert_eq!(heap.at(&key), Ok(&value));
                    let after: Vec<i32> = heap.iter().map(|entry| entry.key).collect();
                    prop_assert_eq!(layout, after);
                    model.insert(key, value);
                } else {
                    prop_assert_eq!(heap.at_mut(&key), Err(HeapError::KeyNotFound));
                    prop_assert_eq!(heap.at(&key), Err(HeapError::KeyNotFound));
                }
            }
        }

        check_state(&heap, &model)?;
    }

    Ok(())
}

/// Test that all extracted keys come out in non-decreasing order
fn test_extract_order_invariant(values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap = IndexedHeap::new();
    let mut inserted = 0;

    for value in &values {
        if heap.insert(*value, ()).is_ok() {
            inserted += 1;
        }
    }
    prop_assert_eq!(heap.len(), inserted);

    let mut last_key = i32::MIN;
    let mut extracted = 0;
    while let Ok(entry) = heap.extract_min() {
        prop_assert!(
            entry.key >= last_key,
            "Extracted key {} is less than previous {}",
            entry.key,
            last_key
        );
        last_key = entry.key;
        extracted += 1;
    }
    prop_assert_eq!(extracted, inserted);

    Ok(())
}

/// Erase every key in a random order, checking invariants on the way
fn test_erase_all_invariant(keys: Vec<i32>, picks: Vec<Index>) -> Result<(), TestCaseError> {
    let mut heap = IndexedHeap::new();
    let mut live: Vec<i32> = Vec::new();

    for key in keys {
        if heap.insert(key, key.wrapping_mul(3)).is_ok() {
            live.push(key);
        }
    }

    for pick in picks {
        if live.is_empty() {
            break;
        }
        let key = live.swap_remove(pick.index(live.len()));
        let entry = heap.erase(&key).unwrap();
        prop_assert_eq!(entry.value, key.wrapping_mul(3));
        prop_assert_eq!(heap.check_invariants(), Ok(()));
        prop_assert_eq!(heap.len(), live.len());
    }

    Ok(())
}

proptest! {
    #[test]
    fn test_natural_operations_match_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        test_operations_against_model(Natural, ops)?;
    }

    #[test]
    fn test_reversed_operations_match_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        test_operations_against_model(Reversed, ops)?;
    }

    #[test]
    fn test_extract_order(values in prop::collection::vec(-1000i32..1000, 0..300)) {
        test_extract_order_invariant(values)?;
    }

    #[test]
    fn test_erase_all(
        keys in prop::collection::vec(-200i32..200, 0..150),
        picks in prop::collection::vec(any::<Index>(), 0..150)
    ) {
        test_erase_all_invariant(keys, picks)?;
    }
}
