//! # Config
//!
//! Configuration structs for the three write-amplification engines (`lsm`,
//! `tlsm`, `hybrid`). Every engine constructor runs its config through
//! [`LsmConfig::validate`] / [`TlsmConfig::validate`] / [`HybridConfig::validate`]
//! before touching any state — configuration errors are detected at
//! construction and are fatal, never recovered from mid-run.

use thiserror::Error;

/// Errors detected while validating an engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A capacity (buffer size, sstable size, ...) was zero or otherwise unusable.
    #[error("{field} must be greater than 0, got {value}")]
    NonPositiveCapacity { field: &'static str, value: i64 },

    /// `min_sequential_buffer_size` left no room for a sequential buffer
    /// below `lsm_buffer_size`.
    #[error(
        "min_sequential_buffer_size ({min}) must be less than lsm_buffer_size ({buffer})"
    )]
    MinSeqBufferTooLarge { min: usize, buffer: usize },

    /// `statistics_number` (the hybrid warm-up sample target) was zero.
    #[error("statistics_number must be greater than 0")]
    ZeroStatisticsNumber,
}

/// Configuration for the two-level [`lsm`](../lsm/index.html) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsmConfig {
    /// Capacity of the in-memory write buffer (`B`).
    pub buffer_size: usize,
    /// Capacity of each on-disk run ("sstable"). Defaults to `buffer_size`.
    pub sstable_size: Option<usize>,
    /// Trailing-window length `W` used by `average_write_amplification_rate`.
    pub statistics_window: usize,
}

impl LsmConfig {
    /// Convenience constructor matching the scenarios in spec.md §8: a
    /// buffer size with the sstable size defaulted and a window of 20,
    /// the same default the Python prototype's `LSM.__init__` uses.
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            sstable_size: None,
            statistics_window: 20,
        }
    }

    /// Resolved sstable (output run) size: `sstable_size` or `buffer_size`.
    #[must_use]
    pub fn resolved_sstable_size(&self) -> usize {
        self.sstable_size.unwrap_or(self.buffer_size)
    }

    /// Validates capacities are positive. Statistics window of `0` is legal
    /// (the empty-history contract in spec §7 means "no rolling window yet",
    /// not an error).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::NonPositiveCapacity {
                field: "buffer_size",
                value: 0,
            });
        }
        if let Some(s) = self.sstable_size {
            if s == 0 {
                return Err(ConfigError::NonPositiveCapacity {
                    field: "sstable_size",
                    value: 0,
                });
            }
        }
        Ok(())
    }
}

/// Configuration for the [`tlsm`](../tlsm/index.html) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsmConfig {
    /// Capacity of the sequential buffer (`n1`).
    pub seq_buffer_size: usize,
    /// Capacity of the non-sequential buffer (`n2`).
    pub nonseq_buffer_size: usize,
    /// Capacity of each on-disk run. Defaults to `n1 + n2`.
    pub sstable_size: Option<usize>,
    /// Trailing-window length used by `average_write_amplification_rate`,
    /// mirroring `LsmConfig::statistics_window` (spec.md §6 lists the
    /// operation on both engines).
    pub statistics_window: usize,
}

impl TlsmConfig {
    /// Same default window (20) as `LsmConfig::new`'s Python-prototype
    /// default.
    #[must_use]
    pub fn new(seq_buffer_size: usize, nonseq_buffer_size: usize) -> Self {
        Self {
            seq_buffer_size,
            nonseq_buffer_size,
            sstable_size: None,
            statistics_window: 20,
        }
    }

    #[must_use]
    pub fn resolved_sstable_size(&self) -> usize {
        self.sstable_size
            .unwrap_or(self.seq_buffer_size + self.nonseq_buffer_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seq_buffer_size == 0 {
            return Err(ConfigError::NonPositiveCapacity {
                field: "seq_buffer_size",
                value: 0,
            });
        }
        if self.nonseq_buffer_size == 0 {
            return Err(ConfigError::NonPositiveCapacity {
                field: "nonseq_buffer_size",
                value: 0,
            });
        }
        if let Some(s) = self.sstable_size {
            if s == 0 {
                return Err(ConfigError::NonPositiveCapacity {
                    field: "sstable_size",
                    value: 0,
                });
            }
        }
        Ok(())
    }
}

/// Configuration for the [`hybrid`](../hybrid/index.html) adaptive ingester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridConfig {
    /// Capacity of the LSM-mode write buffer (`B`), also the tLSM split total
    /// (`n1 + n2`) once switched.
    pub lsm_buffer_size: usize,
    /// Spacing between consecutive generation times (`Δt`), used by the
    /// candidate-n1 estimator to evaluate the delay CDF at `i · Δt`.
    pub gen_time_interval: i64,
    /// Capacity of each on-disk run. Defaults to `lsm_buffer_size`.
    pub sstable_size: Option<usize>,
    /// Unused by the estimator itself (the prototype never reads it back),
    /// kept for parity with the external interface in spec §6.
    pub delay_buffer_size: usize,
    /// Warm-up sample target `N`: both the delay list and the fan-in window
    /// must reach this size before the switch predicate can fire.
    pub statistics_number: usize,
    /// Lower bound `n1_min` on the candidate sequential-buffer size search.
    pub min_sequential_buffer_size: usize,
    /// Debug flag: print every candidate `n1` and its predicted rate.
    pub print_all_n1: bool,
}

impl HybridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lsm_buffer_size == 0 {
            return Err(ConfigError::NonPositiveCapacity {
                field: "lsm_buffer_size",
                value: 0,
            });
        }
        if self.statistics_number == 0 {
            return Err(ConfigError::ZeroStatisticsNumber);
        }
        if self.min_sequential_buffer_size >= self.lsm_buffer_size {
            return Err(ConfigError::MinSeqBufferTooLarge {
                min: self.min_sequential_buffer_size,
                buffer: self.lsm_buffer_size,
            });
        }
        if let Some(s) = self.sstable_size {
            if s == 0 {
                return Err(ConfigError::NonPositiveCapacity {
                    field: "sstable_size",
                    value: 0,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn resolved_sstable_size(&self) -> usize {
        self.sstable_size.unwrap_or(self.lsm_buffer_size)
    }
}
