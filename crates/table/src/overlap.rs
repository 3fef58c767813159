//! The tail-first overlap scan shared by the LSM engine, the tLSM
//! non-sequential flush path, and the hybrid ingester's pre-switch LSM path
//! (spec.md §4.3 step 1, §4.4 non-sequential flush step 2, §4.5 pre-switch).
//!
//! Factored out once instead of reimplemented per engine, the way the
//! teacher factors `MergeIterator` out of `compaction::compact` rather than
//! inlining the merge loop at each call site.

use crate::table::{Gen, Table};

/// Pops tables from the tail of `level1` while the tail's `max_gen` overlaps
/// `new_min`, returning them in tail-first order (the order they were
/// popped — first popped is the table that was furthest toward the tail).
///
/// `level1`'s invariant (spec.md §3: adjacent tables are strictly
/// non-overlapping by key) means this scan always stops at the first
/// non-overlapping table it finds; it never needs to look past it.
pub fn resolve_overlap(level1: &mut Vec<Table>, new_min: Gen) -> Vec<Table> {
    let mut overlap = Vec::new();
    while let Some(last) = level1.last() {
        if last.max_gen() > new_min {
            overlap.push(level1.pop().expect("checked non-empty above"));
        } else {
            break;
        }
    }
    overlap
}
