//! The candidate sequential-buffer-size estimator (spec.md §4.5): a
//! rational-function model of tLSM write amplification as a function of the
//! sequential/non-sequential split, parameterized by the observed
//! compaction fan-in and the empirical delay CDF.
//!
//! Reproduces `Hybrid.__get_candidate_n1` from
//! `examples/original_source/simulation-experiments/implement.py` exactly,
//! with one indexing change: the Python prefix array is built with a `-1`
//! sentinel at index 0 (`sum_list = [-1]`) so it can be indexed directly by
//! `g_plus_n1`. This port instead builds a zero-based `Vec<f64>` of length
//! `buffer_size` where `prefix[k]` holds the same cumulative sum — the same
//! recurrence without the off-by-one indirection.

use crate::delay_cdf::DelayCdf;
use table::Gen;

/// Searches `g+n1 in [min_sequential_buffer_size, buffer_size)` for the
/// split minimizing the predicted write-amplification rate `r`, returning
/// the winning `n1` rounded to the nearest integer.
///
/// On exact ties the smallest `n1` wins (spec.md §4.5's explicit MUST):
/// since the search runs in ascending `g+n1` order and the prefix sum is
/// non-decreasing, only a strict improvement (`r < best_r`) replaces the
/// current best.
#[must_use]
pub fn candidate_n1(
    eta_bar: f64,
    cdf: &DelayCdf,
    buffer_size: usize,
    gen_time_interval: Gen,
    min_sequential_buffer_size: usize,
    print_all_n1: bool,
) -> i64 {
    let mut prefix = vec![0.0f64; buffer_size];
    for k in 1..buffer_size {
        prefix[k] = prefix[k - 1] + cdf.f(k as Gen * gen_time_interval);
    }

    let mut best_r = f64::INFINITY;
    let mut best_n1 = min_sequential_buffer_size as f64;

    for g_plus_n1 in min_sequential_buffer_size..buffer_size {
        let s = prefix[g_plus_n1];
        let g_value = g_plus_n1 as f64 - s;
        if g_value <= 0.0 {
            // F has already saturated to 1 by this point in the search;
            // the rational form would divide by zero. Skip rather than
            // let the candidate poison the minimum with NaN/inf.
            continue;
        }
        let n1_value = s;
        let n2_value = buffer_size as f64 - n1_value;
        let tmp = n1_value * n2_value / g_value;
        let r = 2.0 + (eta_bar * buffer_size as f64) / (tmp + n2_value);

        if print_all_n1 {
            tracing::debug!(g_plus_n1, n1_value, r, "candidate n1");
        }

        if r < best_r {
            best_r = r;
            best_n1 = n1_value;
        }
    }

    best_n1.round() as i64
}
