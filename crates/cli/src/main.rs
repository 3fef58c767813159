//! # CLI - write-amplification workload runner
//!
//! A one-shot binary: reads `arrival_time,gen_time,value` CSV rows (sorted
//! ascending by `arrival_time`, per the workload input format) from a file
//! path argument or stdin, drives one of the three engines (`lsm`, `tlsm`,
//! `hybrid`), and prints a plain-text key/value report on stdout.
//!
//! ## Configuration
//!
//! All settings are controlled via environment variables:
//!
//! ```text
//! WASIM_MODE                  lsm | tlsm | hybrid          (default: "lsm")
//! WASIM_BUFFER_SIZE           LSM/hybrid write buffer B    (default: 1024)
//! WASIM_SEQ_BUFFER_SIZE       tLSM sequential buffer n1    (default: 512)
//! WASIM_NONSEQ_BUFFER_SIZE    tLSM non-sequential buffer n2 (default: 512)
//! WASIM_SSTABLE_SIZE          on-disk run size S           (default: unset -> engine default)
//! WASIM_STATISTICS_WINDOW     LSM/tLSM trailing window W   (default: 20)
//! WASIM_GEN_TIME_INTERVAL     hybrid Δt                    (default: 1)
//! WASIM_STATISTICS_NUMBER     hybrid warm-up sample count N (default: 20)
//! WASIM_MIN_SEQ_BUFFER_SIZE   hybrid n1_min                (default: 1)
//! WASIM_DELAY_BUFFER_SIZE     hybrid delay CDF cap          (default: 2000)
//! WASIM_PRINT_ALL_N1          hybrid debug flag            (default: "false")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ WASIM_MODE=tlsm WASIM_SEQ_BUFFER_SIZE=64 WASIM_NONSEQ_BUFFER_SIZE=64 cli workload.csv
//! mode: tlsm
//! rows: 100000
//! total_points: 100000
//! total_writes: 142310
//! average_write_amplification_rate: 1.4231
//! ```

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{bail, Context, Result};
use config::{HybridConfig, LsmConfig, TlsmConfig};
use hybrid::Hybrid;
use lsm::Lsm;
use table::Gen;
use tlsm::Tlsm;

struct Row {
    arrival_time: Gen,
    gen_time: Gen,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_parse_opt<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parses `arrival_time,gen_time,value` rows, ignoring `value` (spec's
/// write-amplification core only consumes the two keys).
fn parse_rows(reader: impl BufRead) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading row {}", i + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, ',');
        let arrival_time: Gen = parts
            .next()
            .context("missing arrival_time column")?
            .trim()
            .parse()
            .with_context(|| format!("row {}: invalid arrival_time", i + 1))?;
        let gen_time: Gen = parts
            .next()
            .context("missing gen_time column")?
            .trim()
            .parse()
            .with_context(|| format!("row {}: invalid gen_time", i + 1))?;
        rows.push(Row {
            arrival_time,
            gen_time,
        });
    }
    Ok(rows)
}

fn read_input() -> Result<Vec<Row>> {
    match env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            parse_rows(BufReader::new(file))
        }
        None => parse_rows(io::stdin().lock()),
    }
}

fn run_lsm(rows: &[Row]) -> Result<()> {
    let config = LsmConfig {
        buffer_size: env_parse("WASIM_BUFFER_SIZE", 1024),
        sstable_size: env_parse_opt("WASIM_SSTABLE_SIZE"),
        statistics_window: env_parse("WASIM_STATISTICS_WINDOW", 20),
    };
    let mut engine = Lsm::new(config)?;
    for row in rows {
        engine.write(row.gen_time);
    }
    engine.flush();

    println!("mode: lsm");
    println!("rows: {}", rows.len());
    println!("total_points: {}", engine.level1_point_count());
    println!("total_writes: {}", engine.total_writes());
    println!(
        "average_write_amplification_rate: {:.4}",
        engine.average_write_amplification_rate()
    );
    Ok(())
}

fn run_tlsm(rows: &[Row]) -> Result<()> {
    let config = TlsmConfig {
        seq_buffer_size: env_parse("WASIM_SEQ_BUFFER_SIZE", 512),
        nonseq_buffer_size: env_parse("WASIM_NONSEQ_BUFFER_SIZE", 512),
        sstable_size: env_parse_opt("WASIM_SSTABLE_SIZE"),
        statistics_window: env_parse("WASIM_STATISTICS_WINDOW", 20),
    };
    let mut engine = Tlsm::new(config)?;
    for row in rows {
        engine.write(row.gen_time);
    }
    engine.flush();

    let (points, writes) = engine.get_write_amplification();

    println!("mode: tlsm");
    println!("rows: {}", rows.len());
    println!("total_points: {points}");
    println!("total_writes: {writes}");
    println!("cycles: {}", engine.history_rewrite().len());
    println!(
        "average_write_amplification_rate: {:.4}",
        engine.average_write_amplification_rate()
    );
    Ok(())
}

fn run_hybrid(rows: &[Row]) -> Result<()> {
    let config = HybridConfig {
        lsm_buffer_size: env_parse("WASIM_BUFFER_SIZE", 1024),
        gen_time_interval: env_parse("WASIM_GEN_TIME_INTERVAL", 1),
        sstable_size: env_parse_opt("WASIM_SSTABLE_SIZE"),
        delay_buffer_size: env_parse("WASIM_DELAY_BUFFER_SIZE", 2000),
        statistics_number: env_parse("WASIM_STATISTICS_NUMBER", 20),
        min_sequential_buffer_size: env_parse("WASIM_MIN_SEQ_BUFFER_SIZE", 1),
        print_all_n1: env_parse("WASIM_PRINT_ALL_N1", false),
    };
    let mut engine = Hybrid::new(config)?;
    for row in rows {
        let delay = row.arrival_time - row.gen_time;
        engine.write(row.gen_time, delay);
    }
    engine.flush();

    println!("mode: hybrid");
    println!("rows: {}", rows.len());
    println!("used_tlsm: {}", engine.use_tlsm());
    println!(
        "candidate_n1: {}",
        engine
            .candidate_n1()
            .map_or_else(|| "n/a".to_string(), |n| n.to_string())
    );
    println!(
        "total_points: {}",
        engine.level1().iter().map(table::Table::len).sum::<usize>()
    );
    println!("total_writes: {}", engine.total_writes());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mode = env_or("WASIM_MODE", "lsm");
    let rows = read_input()?;

    match mode.as_str() {
        "lsm" => run_lsm(&rows),
        "tlsm" => run_tlsm(&rows),
        "hybrid" => run_hybrid(&rows),
        other => bail!("unknown WASIM_MODE: {other} (expected lsm, tlsm, or hybrid)"),
    }
}
