//! Integration tests driving the built `cli` binary directly, the same way
//! the pack's CLI integration suites exercise a REPL subprocess: spawn the
//! binary, feed it input on stdin, and assert on captured stdout.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs the CLI with the given environment and CSV body on stdin, returning
/// captured stdout.
fn run_cli(env: &[(&str, &str)], csv_body: &str) -> String {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-q", "-p", "cli", "--"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (k, v) in env {
        cmd.env(k, v);
    }

    let mut child = cmd.spawn().expect("failed to spawn cli");
    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        stdin
            .write_all(csv_body.as_bytes())
            .expect("failed to write csv body");
    }
    let output = child.wait_with_output().expect("failed to read output");
    assert!(
        output.status.success(),
        "cli exited non-zero: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Runs the CLI with the workload read from a file path argument instead of
/// stdin, returning captured stdout.
fn run_cli_with_file(env: &[(&str, &str)], csv_body: &str) -> String {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let csv_path = dir.path().join("workload.csv");
    std::fs::write(&csv_path, csv_body).expect("failed to write workload csv");

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-q", "-p", "cli", "--"])
        .arg(&csv_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (k, v) in env {
        cmd.env(k, v);
    }

    let output = cmd.output().expect("failed to run cli");
    assert!(
        output.status.success(),
        "cli exited non-zero: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn monotonic_csv(n: i64) -> String {
    (1..=n)
        .map(|g| format!("{g},{g},v{g}\n"))
        .collect::<String>()
}

#[test]
fn lsm_mode_reports_no_overlap_stream() {
    let output = run_cli(
        &[("WASIM_MODE", "lsm"), ("WASIM_BUFFER_SIZE", "4")],
        &monotonic_csv(8),
    );
    assert!(output.contains("mode: lsm"));
    assert!(output.contains("rows: 8"));
    assert!(output.contains("total_writes: 8"));
}

#[test]
fn tlsm_mode_reports_point_and_write_totals() {
    let output = run_cli(
        &[
            ("WASIM_MODE", "tlsm"),
            ("WASIM_SEQ_BUFFER_SIZE", "4"),
            ("WASIM_NONSEQ_BUFFER_SIZE", "4"),
        ],
        &monotonic_csv(8),
    );
    assert!(output.contains("mode: tlsm"));
    assert!(output.contains("total_points: 8"));
}

#[test]
fn hybrid_mode_reports_switch_state() {
    let output = run_cli(
        &[
            ("WASIM_MODE", "hybrid"),
            ("WASIM_BUFFER_SIZE", "4"),
            ("WASIM_STATISTICS_NUMBER", "2"),
            ("WASIM_MIN_SEQ_BUFFER_SIZE", "1"),
        ],
        &monotonic_csv(64),
    );
    assert!(output.contains("mode: hybrid"));
    assert!(output.contains("used_tlsm:"));
}

#[test]
fn lsm_mode_reads_workload_from_a_file_path_argument() {
    let output = run_cli_with_file(
        &[("WASIM_MODE", "lsm"), ("WASIM_BUFFER_SIZE", "4")],
        &monotonic_csv(8),
    );
    assert!(output.contains("mode: lsm"));
    assert!(output.contains("rows: 8"));
    assert!(output.contains("total_writes: 8"));
}

#[test]
fn unknown_mode_exits_non_zero() {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-q", "-p", "cli", "--"])
        .env("WASIM_MODE", "bogus")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("failed to spawn cli");
    drop(child.stdin.take());
    let output = child.wait_with_output().expect("failed to read output");
    assert!(!output.status.success());
}
