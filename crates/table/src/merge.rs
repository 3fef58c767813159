//! k-way merge-sort over a set of tables (spec.md §4.2).
//!
//! Structurally the same min-heap idiom as the teacher's
//! `sstable::merge::MergeIterator` (a heap keyed by the current head of each
//! source, refilled on pop), adapted from "fetch the value from disk when it
//! reaches the top of the heap" to "pop the owned entry directly" since
//! there's no backing file here.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::table::{Entry, Gen, Table};

/// Merges `tables` into an ordered sequence of output tables, each holding
/// `output_capacity` entries except possibly the last.
///
/// A k-way merge driven by each input's `peek()`: on every step the input
/// with the smallest peeked key is popped (incrementing that entry's
/// `write_count`) and appended to the table currently being built. Ties are
/// broken by the lowest input index, matching the Python prototype's
/// `np.nanargmin` (which returns the first occurrence on ties).
///
/// The `k == 1` case is a pass-through: the single input table is returned
/// unchanged, without incrementing any write count. This differs
/// deliberately from the `k > 1` path (spec.md §9's pinned Open Question) —
/// tests cover this exact asymmetry.
///
/// # Panics
///
/// Panics if `tables` is empty or `output_capacity` is zero — both are
/// caller bugs, not recoverable input (the caller is always an engine that
/// knows it has at least one table to merge).
#[must_use]
pub fn merge_sort(mut tables: Vec<Table>, output_capacity: usize) -> Vec<Table> {
    assert!(!tables.is_empty(), "merge_sort requires at least one table");
    assert!(output_capacity > 0, "output_capacity must be positive");

    if tables.len() == 1 {
        return tables;
    }

    let mut heap: BinaryHeap<Reverse<(Gen, usize)>> = BinaryHeap::with_capacity(tables.len());
    for (i, t) in tables.iter().enumerate() {
        if let Some(key) = t.peek() {
            heap.push(Reverse((key, i)));
        }
    }

    let mut outputs = Vec::new();
    let mut current: Vec<Entry> = Vec::with_capacity(output_capacity);

    while let Some(Reverse((_, source))) = heap.pop() {
        let entry = tables[source].pop();
        current.push(entry);

        if let Some(next_key) = tables[source].peek() {
            heap.push(Reverse((next_key, source)));
        }

        if current.len() == output_capacity {
            outputs.push(Table::new(std::mem::take(&mut current), 0, true));
        }
    }

    if !current.is_empty() {
        outputs.push(Table::new(current, 0, true));
    }

    outputs
}
