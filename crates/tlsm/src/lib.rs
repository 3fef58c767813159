//! # tLSM
//!
//! The "timestamp LSM" variant (spec.md §4.4): a sequential buffer that
//! flushes directly to the L1 tail (no overlap scan, no merge), and a
//! non-sequential buffer that still triggers the same overlap-resolving
//! merge-sort the `lsm` crate uses.

use config::{ConfigError, TlsmConfig};
use table::{Entry, Gen, Table};

/// The per-cycle decomposition of a non-sequential flush's merge group into
/// merge-sorted-origin and direct-flushed-origin contributions.
///
/// A named struct rather than the bare 5-tuple of spec.md §4.4 step 2 —
/// idiomatic Rust prefers a labelled type over asking callers to remember a
/// tuple's field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRecord {
    pub merge_sorted_sstable_number: usize,
    pub direct_flushed_sstable_number: usize,
    pub merge_sorted_points_number: usize,
    pub direct_flushed_points_number: usize,
    pub total: usize,
}

/// Owns both buffers and L1 for one simulated tLSM instance.
pub struct Tlsm {
    config: TlsmConfig,
    seq_buf: Vec<Gen>,
    nonseq_buf: Vec<Gen>,
    level1: Vec<Table>,
    max_gen_on_l1: Gen,

    points_in_cycle: u64,
    seq_flushes_in_cycle: u64,
    nonseq_while_seq_filling: u64,

    history_rewrite: Vec<RewriteRecord>,
    history_write_amp_rate: Vec<f64>,
    history_seq_flushes_per_cycle: Vec<u64>,
    history_points_per_cycle: Vec<u64>,
    history_nonseq_when_seq_full: Vec<u64>,
}

impl Tlsm {
    pub fn new(config: TlsmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            seq_buf: Vec::with_capacity(config.seq_buffer_size),
            nonseq_buf: Vec::with_capacity(config.nonseq_buffer_size),
            config,
            level1: Vec::new(),
            max_gen_on_l1: 0,
            points_in_cycle: 0,
            seq_flushes_in_cycle: 0,
            nonseq_while_seq_filling: 0,
            history_rewrite: Vec::new(),
            history_write_amp_rate: Vec::new(),
            history_seq_flushes_per_cycle: Vec::new(),
            history_points_per_cycle: Vec::new(),
            history_nonseq_when_seq_full: Vec::new(),
        })
    }

    /// `gen` is sequential iff it exceeds every key ever persisted to L1.
    fn is_sequential(&self, gen: Gen) -> bool {
        gen > self.max_gen_on_l1
    }

    pub fn write(&mut self, gen: Gen) {
        self.points_in_cycle += 1;
        if self.is_sequential(gen) {
            self.seq_buf.push(gen);
            if self.seq_buf.len() == self.config.seq_buffer_size {
                self.flush_sequential();
            }
        } else {
            self.nonseq_while_seq_filling += 1;
            self.nonseq_buf.push(gen);
            if self.nonseq_buf.len() == self.config.nonseq_buffer_size {
                self.flush_non_sequential();
            }
        }
    }

    /// Drains the sequential buffer, then the non-sequential buffer, in that
    /// order (spec.md §4.4). Safe to call with both buffers empty.
    pub fn flush(&mut self) {
        self.flush_sequential();
        self.flush_non_sequential();
    }

    fn flush_sequential(&mut self) {
        if self.seq_buf.is_empty() {
            return;
        }
        let mut gens = std::mem::take(&mut self.seq_buf);
        gens.sort_unstable();
        let entries: Vec<Entry> = gens
            .into_iter()
            .map(|gen| Entry { gen, write_count: 1 })
            .collect();
        let table = Table::new(entries, 0, false);
        self.max_gen_on_l1 = table.max_gen();
        tracing::debug!(size = table.len(), "sequential flush");
        self.level1.push(table);

        self.seq_flushes_in_cycle += 1;
        self.history_nonseq_when_seq_full
            .push(self.nonseq_while_seq_filling);
        self.nonseq_while_seq_filling = 0;
    }

    fn flush_non_sequential(&mut self) {
        if self.nonseq_buf.is_empty() {
            return;
        }
        let mut gens = std::mem::take(&mut self.nonseq_buf);
        gens.sort_unstable();
        let entries: Vec<Entry> = gens.into_iter().map(Entry::new).collect();
        let new_table = Table::new(entries, 0, false);

        let overlap = table::resolve_overlap(&mut self.level1, new_table.min_gen());

        let merge_sorted_sstable_number = overlap.iter().filter(|t| t.from_merge_sort()).count();
        let direct_flushed_sstable_number = overlap.len() - merge_sorted_sstable_number;
        let merge_sorted_points_number: usize = overlap
            .iter()
            .filter(|t| t.from_merge_sort())
            .map(Table::len)
            .sum();
        let direct_flushed_points_number: usize = overlap
            .iter()
            .filter(|t| !t.from_merge_sort())
            .map(Table::len)
            .sum();
        let total = merge_sorted_points_number + direct_flushed_points_number;

        self.history_rewrite.push(RewriteRecord {
            merge_sorted_sstable_number,
            direct_flushed_sstable_number,
            merge_sorted_points_number,
            direct_flushed_points_number,
            total,
        });
        let rate = if self.points_in_cycle == 0 {
            0.0
        } else {
            total as f64 / self.points_in_cycle as f64
        };
        self.history_write_amp_rate.push(rate);

        tracing::debug!(fanin = overlap.len(), total, "non-sequential flush");
        let mut group = overlap;
        group.push(new_table);
        let merged = table::merge_sort(group, self.config.resolved_sstable_size());
        self.level1.extend(merged);

        self.history_seq_flushes_per_cycle
            .push(self.seq_flushes_in_cycle);
        self.history_points_per_cycle.push(self.points_in_cycle);
        self.seq_flushes_in_cycle = 0;
        self.points_in_cycle = 0;
    }

    /// `(points on L1, write_count summed over L1)`.
    #[must_use]
    pub fn get_write_amplification(&self) -> (u64, u64) {
        let points: u64 = self.level1.iter().map(|t| t.len() as u64).sum();
        let writes: u64 = self.level1.iter().map(Table::total_writes).sum();
        (points, writes)
    }

    /// Mean of `history_write_amp_rate` over the configured trailing window
    /// (spec.md §4.6, §6: `average_write_amplification_rate()` is part of
    /// both the LSM and tLSM external interfaces). `0.0` before any
    /// non-sequential flush has completed a cycle.
    #[must_use]
    pub fn average_write_amplification_rate(&self) -> f64 {
        stats::trailing_mean_f64(&self.history_write_amp_rate, self.config.statistics_window)
    }

    #[must_use]
    pub fn history_rewrite(&self) -> &[RewriteRecord] {
        &self.history_rewrite
    }

    #[must_use]
    pub fn history_write_amp_rate(&self) -> &[f64] {
        &self.history_write_amp_rate
    }

    #[must_use]
    pub fn history_seq_flushes_per_cycle(&self) -> &[u64] {
        &self.history_seq_flushes_per_cycle
    }

    #[must_use]
    pub fn history_points_per_cycle(&self) -> &[u64] {
        &self.history_points_per_cycle
    }

    #[must_use]
    pub fn history_nonseq_when_seq_full(&self) -> &[u64] {
        &self.history_nonseq_when_seq_full
    }

    #[must_use]
    pub fn max_gen_on_l1(&self) -> Gen {
        self.max_gen_on_l1
    }

    #[must_use]
    pub fn level1(&self) -> &[Table] {
        &self.level1
    }
}

#[cfg(test)]
mod tests;
