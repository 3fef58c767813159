//! # LSM
//!
//! The classic two-level engine (spec.md §4.3): a single in-memory write
//! buffer that flushes into an ordered, non-overlapping run sequence ("L1"),
//! resolving overlap with the tail of L1 via [`table::resolve_overlap`] and
//! [`table::merge_sort`] rather than re-deriving either primitive here.

use config::{ConfigError, LsmConfig};
use table::{Entry, Gen, Table};

/// Owns the write buffer and L1 for one simulated LSM instance.
pub struct Lsm {
    config: LsmConfig,
    buffer: Vec<Gen>,
    level1: Vec<Table>,
    history_merge_fanin: Vec<usize>,
    total_writes: u64,
}

impl Lsm {
    /// Validates `config` and constructs an empty engine.
    pub fn new(config: LsmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            buffer: Vec::with_capacity(config.buffer_size),
            config,
            level1: Vec::new(),
            history_merge_fanin: Vec::new(),
            total_writes: 0,
        })
    }

    /// Appends `gen` to the write buffer, flushing it if it has just filled.
    pub fn write(&mut self, gen: Gen) {
        self.buffer.push(gen);
        tracing::trace!(gen, buffer_len = self.buffer.len(), "lsm write");
        if self.buffer.len() == self.config.buffer_size {
            self.flush_buffer();
        }
    }

    /// Flushes any remaining buffered points. Safe to call with an empty
    /// buffer (invariant 8: idempotent with no intervening writes).
    pub fn flush(&mut self) {
        self.flush_buffer();
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut gens = std::mem::take(&mut self.buffer);
        gens.sort_unstable();
        let entries: Vec<Entry> = gens.into_iter().map(Entry::new).collect();
        let new_table = Table::new(entries, 0, false);
        tracing::debug!(size = new_table.len(), "flushing lsm buffer");
        self.merge_into_l1(new_table);
    }

    fn merge_into_l1(&mut self, new: Table) {
        let overlap = table::resolve_overlap(&mut self.level1, new.min_gen());
        let fanin = overlap.len();
        self.history_merge_fanin.push(fanin);

        if overlap.is_empty() {
            let mut new = new;
            new.rewrite();
            self.total_writes += new.total_writes();
            self.level1.push(new);
        } else {
            let mut group = overlap;
            group.push(new);
            let points: u64 = group.iter().map(|t| t.len() as u64).sum();
            self.total_writes += points;
            tracing::debug!(fanin, points, "merging into l1");
            let merged = table::merge_sort(group, self.config.resolved_sstable_size());
            self.level1.extend(merged);
        }
    }

    /// Per-flush compaction fan-in, one entry per buffer flush.
    #[must_use]
    pub fn history_merge_fanin(&self) -> &[usize] {
        &self.history_merge_fanin
    }

    /// Mean fan-in over the configured trailing window. `0.0` before any
    /// flush has occurred.
    #[must_use]
    pub fn average_write_amplification_rate(&self) -> f64 {
        stats::trailing_mean(&self.history_merge_fanin, self.config.statistics_window)
    }

    #[must_use]
    pub fn total_writes(&self) -> u64 {
        self.total_writes
    }

    #[must_use]
    pub fn level1_len(&self) -> usize {
        self.level1.len()
    }

    #[must_use]
    pub fn level1_point_count(&self) -> usize {
        self.level1.iter().map(Table::len).sum()
    }

    #[must_use]
    pub fn level1(&self) -> &[Table] {
        &self.level1
    }
}
