//! # Hybrid
//!
//! The adaptive ingester (spec.md §4.5): runs in LSM mode during a warm-up
//! period, collecting a running window of per-compaction fan-in and the
//! full observed delay list, then computes a predicted-optimal sequential
//! buffer size and switches, irreversibly, to a tLSM-style write path that
//! shares its L1 with the warm-up phase instead of starting over.

mod delay_cdf;
mod estimator;

pub use delay_cdf::DelayCdf;

use config::{ConfigError, HybridConfig};
use table::{Entry, Gen, Table};
use tlsm::RewriteRecord;

/// Owns the warm-up LSM state, the shared L1, and (once switched) the
/// tLSM-style sequential/non-sequential buffers.
pub struct Hybrid {
    config: HybridConfig,

    // LSM-mode (pre-switch) state.
    lsm_buffer: Vec<Gen>,
    delays: Vec<Gen>,
    eta_window: stats::Window,
    history_merge_fanin: Vec<usize>,

    // Shared L1, carried across the switch unchanged.
    level1: Vec<Table>,

    // Switch state.
    switched: bool,
    candidate_n1: Option<i64>,

    // tLSM-mode (post-switch) state.
    seq_buffer_size: usize,
    nonseq_buffer_size: usize,
    seq_buf: Vec<Gen>,
    nonseq_buf: Vec<Gen>,
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

impl Hybrid {
    pub fn new(config: HybridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let eta_window = stats::Window::new(config.statistics_number);
        Ok(Self {
            lsm_buffer: Vec::with_capacity(config.lsm_buffer_size),
            delays: Vec::new(),
            eta_window,
            history_merge_fanin: Vec::new(),
            level1: Vec::new(),
            switched: false,
            candidate_n1: None,
            seq_buffer_size: 0,
            nonseq_buffer_size: 0,
            seq_buf: Vec::new(),
            nonseq_buf: Vec::new(),
            max_gen_on_l1: 0,
            points_in_cycle: 0,
            seq_flushes_in_cycle: 0,
            nonseq_while_seq_filling: 0,
            history_rewrite: Vec::new(),
            history_write_amp_rate: Vec::new(),
            history_seq_flushes_per_cycle: Vec::new(),
            history_points_per_cycle: Vec::new(),
            history_nonseq_when_seq_full: Vec::new(),
            config,
        })
    }

    /// Accepts one point. Before the switch, `delay` is recorded as a
    /// warm-up sample; after, it is ignored (the tLSM path has no use for
    /// it) — matching the Python prototype's `write(val, delay)`, which
    /// only ever reads `delay` pre-switch.
    pub fn write(&mut self, gen: Gen, delay: Gen) {
        if !self.switched {
            if self.should_switch() {
                self.perform_switch();
            } else {
                self.delays.push(delay);
            }
        }

        if self.switched {
            self.write_tlsm(gen);
        } else {
            self.write_lsm(gen);
        }
    }

    fn should_switch(&self) -> bool {
        self.delays.len() >= self.config.statistics_number && self.eta_window.full()
    }

    fn perform_switch(&mut self) {
        self.flush_lsm_buffer();
        let n1 = self.compute_candidate_n1();
        let n1 = n1.clamp(
            self.config.min_sequential_buffer_size as i64,
            self.config.lsm_buffer_size as i64 - 1,
        );
        let n1_usize = n1 as usize;

        self.seq_buffer_size = n1_usize;
        self.nonseq_buffer_size = self.config.lsm_buffer_size - n1_usize;
        self.candidate_n1 = Some(n1);
        self.max_gen_on_l1 = self
            .level1
            .last()
            .map(Table::max_gen)
            .expect("warm-up has produced at least one L1 table by switch time");
        self.switched = true;

        tracing::info!(
            n1 = self.seq_buffer_size,
            n2 = self.nonseq_buffer_size,
            "switching to tlsm mode"
        );
    }

    fn compute_candidate_n1(&self) -> i64 {
        let cdf = DelayCdf::build(&self.delays);
        let eta_bar = self.eta_window.mean();
        estimator::candidate_n1(
            eta_bar,
            &cdf,
            self.config.lsm_buffer_size,
            self.config.gen_time_interval,
            self.config.min_sequential_buffer_size,
            self.config.print_all_n1,
        )
    }

    // ---------------------------------------------------------------
    // LSM-mode path (pre-switch)
    // ---------------------------------------------------------------

    fn write_lsm(&mut self, gen: Gen) {
        self.lsm_buffer.push(gen);
        if self.lsm_buffer.len() == self.config.lsm_buffer_size {
            self.flush_lsm_buffer();
        }
    }

    fn flush_lsm_buffer(&mut self) {
        if self.lsm_buffer.is_empty() {
            return;
        }
        let mut gens = std::mem::take(&mut self.lsm_buffer);
        gens.sort_unstable();
        let entries: Vec<Entry> = gens.into_iter().map(Entry::new).collect();
        let new_table = Table::new(entries, 0, false);
        self.merge_into_l1(new_table);
    }

    fn merge_into_l1(&mut self, new: Table) {
        let overlap = table::resolve_overlap(&mut self.level1, new.min_gen());
        let fanin = overlap.len();
        self.eta_window.push(fanin as f64);
        self.history_merge_fanin.push(fanin);

        if overlap.is_empty() {
            let mut new = new;
            new.rewrite();
            self.level1.push(new);
        } else {
            let mut group = overlap;
            group.push(new);
            let merged = table::merge_sort(group, self.config.resolved_sstable_size());
            self.level1.extend(merged);
        }
    }

    // ---------------------------------------------------------------
    // tLSM-mode path (post-switch) — structurally identical to the `tlsm`
    // crate, operating on the buffers/L1 this struct already owns instead
    // of delegating to a separate `Tlsm` instance, since L1 here carries
    // over state accumulated during warm-up.
    // ---------------------------------------------------------------

    fn write_tlsm(&mut self, gen: Gen) {
        self.points_in_cycle += 1;
        if gen > self.max_gen_on_l1 {
            self.seq_buf.push(gen);
            if self.seq_buf.len() == self.seq_buffer_size {
                self.flush_sequential();
            }
        } else {
            self.nonseq_while_seq_filling += 1;
            self.nonseq_buf.push(gen);
            if self.nonseq_buf.len() == self.nonseq_buffer_size {
                self.flush_non_sequential();
            }
        }
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

    /// Drains whichever buffers currently hold data: both LSM-mode and
    /// tLSM-mode buffers are harmless no-ops when empty, so calling this
    /// regardless of `use_tlsm()` is always safe.
    pub fn flush(&mut self) {
        self.flush_lsm_buffer();
        self.flush_sequential();
        self.flush_non_sequential();
    }

    #[must_use]
    pub fn use_tlsm(&self) -> bool {
        self.switched
    }

    #[must_use]
    pub fn candidate_n1(&self) -> Option<i64> {
        self.candidate_n1
    }

    /// Sum of `write_count` across every L1 table, derived rather than
    /// tracked as a running counter (the same approach `tlsm`'s
    /// `get_write_amplification` uses) — a running counter would need
    /// updating in both the pre-switch and post-switch flush paths, and
    /// L1 entries already carry their own accumulated `write_count`.
    #[must_use]
    pub fn total_writes(&self) -> u64 {
        self.level1.iter().map(Table::total_writes).sum()
    }

    #[must_use]
    pub fn level1(&self) -> &[Table] {
        &self.level1
    }

    #[must_use]
    pub fn history_merge_fanin(&self) -> &[usize] {
        &self.history_merge_fanin
    }

    #[must_use]
    pub fn history_rewrite(&self) -> &[RewriteRecord] {
        &self.history_rewrite
    }

    #[must_use]
    pub fn history_write_amp_rate(&self) -> &[f64] {
        &self.history_write_amp_rate
    }
}
