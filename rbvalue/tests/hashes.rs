//! Compact vs table hash decoding.

use rbfixture::{HeapBuilder, fixnum};
use rbvalue::{InspectOptions, TraceEvent, inspect_word};

fn traced(heap: &HeapBuilder, word: u64) -> (String, Vec<TraceEvent>) {
    let options = InspectOptions {
        depth: 1,
        trace: true,
    };
    let inspection = inspect_word(heap, word, &options).unwrap();
    (inspection.text, inspection.trace)
}

fn selected_encoding(trace: &[TraceEvent], address: u64) -> &'static str {
    trace
        .iter()
        .find_map(|event| match event {
            TraceEvent::EncodingSelected {
                address: at,
                encoding,
            } if *at == address => Some(*encoding),
            _ => None,
        })
        .expect("no encoding decision traced for the hash")
}

/// Keys from the rendered `K:` lines, in order.
fn rendered_keys(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_once("K: "))
        .map(|(_, key)| key.to_owned())
        .collect()
}

#[test]
fn below_threshold_uses_compact_in_insertion_order() {
    let mut heap = HeapBuilder::new();
    let pairs: Vec<(u64, u64)> = (0..7).map(|i| (fixnum(i), fixnum(100 + i))).collect();
    let hash = heap.hash(&pairs);

    let (text, trace) = traced(&heap, hash);
    assert_eq!(selected_encoding(&trace, hash), "compact");
    let keys = rendered_keys(&text);
    assert_eq!(keys.len(), 7);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(key, &format!("<T_FIXNUM> {i}"), "insertion order broken");
    }
}

#[test]
fn at_threshold_uses_table_with_every_entry_once() {
    let mut heap = HeapBuilder::new();
    let pairs: Vec<(u64, u64)> = (0..8).map(|i| (fixnum(i), fixnum(100 + i))).collect();
    let hash = heap.hash(&pairs);

    let (text, trace) = traced(&heap, hash);
    assert_eq!(selected_encoding(&trace, hash), "table");

    let mut keys = rendered_keys(&text);
    assert_eq!(keys.len(), 8, "cardinality must match the entry count");
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 8, "duplicate keys in table walk");
}

#[test]
fn table_walk_skips_deleted_slots() {
    let mut heap = HeapBuilder::new();
    let pairs: Vec<(u64, u64)> = (0..10).map(|i| (fixnum(i), fixnum(100 + i))).collect();
    let hash = heap.hash_table(&pairs, &[0, 5, 12]);

    let (text, _) = traced(&heap, hash);
    let mut keys = rendered_keys(&text);
    assert_eq!(keys.len(), 10);
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 10);
    // Values stay attached to their keys.
    for i in 0..10 {
        assert!(
            text.contains(&format!("V: <T_FIXNUM> {}", 100 + i)),
            "missing value for key {i}:\n{text}"
        );
    }
}

#[test]
fn threshold_is_exclusive_below_inclusive_at() {
    let mut heap = HeapBuilder::new();
    let seven: Vec<(u64, u64)> = (0..7).map(|i| (fixnum(i), fixnum(i))).collect();
    let eight: Vec<(u64, u64)> = (0..8).map(|i| (fixnum(i), fixnum(i))).collect();
    let compact = heap.hash(&seven);
    let table = heap.hash(&eight);

    let (_, trace) = traced(&heap, compact);
    assert_eq!(selected_encoding(&trace, compact), "compact");
    let (_, trace) = traced(&heap, table);
    assert_eq!(selected_encoding(&trace, table), "table");
}
