//! # Stats
//!
//! The statistics-aggregation primitives shared by `lsm`, `tlsm`, and
//! `hybrid` (spec.md §4.6): a bounded-capacity ring buffer for the hybrid
//! ingester's running fan-in window, and a trailing-window mean helper for
//! the unbounded per-cycle history lists the other two engines keep.
//!
//! Two distinct shapes appear in the Python prototype and are kept distinct
//! here rather than collapsed into one type:
//!
//! - `LSM.history_merge_sstable_number` / `tLSM.history_write_amplification_rate`
//!   grow without bound for the lifetime of the run — every scenario test in
//!   spec.md §8 inspects the *full* history list — and only the reporting
//!   surface (`average_write_amplification_rate`) takes a trailing slice.
//!   [`trailing_mean`] models that: a plain slice-based mean over the last
//!   `window` elements of whatever history `Vec` the engine already owns.
//! - `Hybrid.lsm_eta_list` is a genuinely bounded `BufferedQueue(maxsize=N)`
//!   (`examples/original_source/simulation-experiments/implement.py`) that
//!   the *estimator itself* reads from while the ingester is still running —
//!   it must forget old samples, not just report a windowed view of them.
//!   [`Window`] is the ring-buffer replacement for that bounded queue.

use std::collections::VecDeque;

/// A fixed-capacity ring buffer that overwrites its oldest sample once full,
/// tracking a running sum so [`Window::mean`] is O(1).
///
/// This is the idiomatic Rust replacement for the Python prototype's
/// `BufferedQueue`, which wraps a thread-safe `queue.Queue(maxsize=N)` this
/// single-threaded simulator has no use for — same running-sum bookkeeping,
/// no synchronization.
#[derive(Debug, Clone)]
pub struct Window {
    capacity: usize,
    buf: VecDeque<f64>,
    sum: f64,
}

impl Window {
    /// Creates an empty window of the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero — a zero-capacity window can never
    /// become `full()`, which would make every dependent switch predicate
    /// (spec.md §4.5) vacuously unsatisfiable; callers are expected to
    /// validate this at configuration time instead (see `config::ConfigError`).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be positive");
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
            sum: 0.0,
        }
    }

    /// Appends `value`, evicting the oldest sample first if the window is
    /// already at capacity.
    pub fn push(&mut self, value: f64) {
        if self.buf.len() == self.capacity {
            if let Some(evicted) = self.buf.pop_front() {
                self.sum -= evicted;
            }
        }
        self.buf.push_back(value);
        self.sum += value;
    }

    /// `true` once `len() == capacity`.
    #[must_use]
    pub fn full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Mean of the samples currently held. `0.0` on an empty window — the
    /// empty-history contract from spec.md §7 applies here too.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.buf.is_empty() {
            0.0
        } else {
            self.sum / self.buf.len() as f64
        }
    }
}

/// Mean of the trailing `window` elements of `history`, or `0.0` if `history`
/// is empty (spec.md §7's empty-history contract — requested before any
/// cycle has completed).
///
/// `window == 0` or `window` larger than `history.len()` both just mean
/// "take everything available", matching Python's `history[len-W:]` slicing
/// behavior for `W <= 0` or `W > len`.
#[must_use]
pub fn trailing_mean(history: &[usize], window: usize) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let slice: &[usize] = if window == 0 {
        history
    } else {
        let start = history.len().saturating_sub(window);
        &history[start..]
    };
    let sum: u64 = slice.iter().map(|&v| v as u64).sum();
    sum as f64 / slice.len() as f64
}

/// Same windowed mean as [`trailing_mean`], over a `history` that is
/// already a floating-point ratio per entry (`tLSM::history_write_amp_rate`)
/// rather than an integer count (`LSM::history_merge_fanin`) — kept as a
/// separate function instead of a generic so each call site's history
/// keeps its natural element type.
#[must_use]
pub fn trailing_mean_f64(history: &[f64], window: usize) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let slice: &[f64] = if window == 0 {
        history
    } else {
        let start = history.len().saturating_sub(window);
        &history[start..]
    };
    slice.iter().sum::<f64>() / slice.len() as f64
}

#[cfg(test)]
mod tests;
