use config::TlsmConfig;

use crate::Tlsm;

#[test]
fn classification_drives_sequential_and_merge_paths() {
    // n1=2, n2=2, inputs [10, 20, 5, 15, 30, 40].
    let mut t = Tlsm::new(TlsmConfig::new(2, 2)).unwrap();

    t.write(10);
    t.write(20); // seq buffer fills -> direct flush, L1 = [(10,1),(20,1)]
    assert_eq!(t.max_gen_on_l1(), 20);
    assert_eq!(t.level1().len(), 1);
    assert_eq!(
        t.level1()[0].entries().iter().map(|e| e.gen).collect::<Vec<_>>(),
        vec![10, 20]
    );

    t.write(5);
    t.write(15); // nonseq buffer fills -> merges with the existing table
    assert_eq!(t.level1().len(), 1);
    let merged = &t.level1()[0];
    assert_eq!(
        merged.entries().iter().map(|e| e.gen).collect::<Vec<_>>(),
        vec![5, 10, 15, 20]
    );
    assert_eq!(
        merged
            .entries()
            .iter()
            .map(|e| e.write_count)
            .collect::<Vec<_>>(),
        vec![1, 2, 1, 2]
    );

    t.write(30);
    t.write(40); // sequential again, appended at tail
    assert_eq!(t.level1().len(), 2);
    assert_eq!(
        t.level1()[1].entries().iter().map(|e| e.gen).collect::<Vec<_>>(),
        vec![30, 40]
    );
}

#[test]
fn sequential_flush_never_overlaps_and_grows_l1_by_one() {
    let mut t = Tlsm::new(TlsmConfig::new(2, 2)).unwrap();
    t.write(10);
    t.write(20);
    let before = t.level1().len();
    t.write(30);
    t.write(40);
    assert_eq!(t.level1().len(), before + 1);
    assert!(t.level1()[before].min_gen() > 20);
}

#[test]
fn cycle_histories_stay_aligned_with_nonseq_flush_count() {
    let mut t = Tlsm::new(TlsmConfig::new(2, 2)).unwrap();
    let inputs = [10, 20, 5, 15, 30, 40, 1, 2, 50, 60];
    for g in inputs {
        t.write(g);
    }
    assert_eq!(
        t.history_write_amp_rate().len(),
        t.history_rewrite().len()
    );
    assert_eq!(
        t.history_rewrite().len(),
        t.history_seq_flushes_per_cycle().len()
    );
    assert_eq!(
        t.history_rewrite().len(),
        t.history_points_per_cycle().len()
    );
}

#[test]
fn points_written_equal_total_cycle_points_plus_buffered() {
    let mut t = Tlsm::new(TlsmConfig::new(2, 2)).unwrap();
    let inputs = [10, 20, 5, 15, 30, 40];
    for g in inputs {
        t.write(g);
    }
    let cycle_points: u64 = t.history_points_per_cycle().iter().sum();
    // After the scenario above exactly one cycle has completed (one
    // non-sequential flush), accounting for the 4 points involved in it;
    // the remaining 2 points (30, 40) are still only reflected in L1, not
    // in any completed cycle.
    assert_eq!(cycle_points, 4);
}

#[test]
fn flush_drains_both_buffers_and_is_idempotent() {
    let mut t = Tlsm::new(TlsmConfig::new(4, 4)).unwrap();
    t.write(10);
    t.write(-1); // non-sequential (max_gen_on_l1 is still 0, nothing flushed yet)
    t.flush();
    assert_eq!(t.get_write_amplification().0, 2);
    let before = t.get_write_amplification();
    t.flush();
    assert_eq!(t.get_write_amplification(), before);
}

#[test]
fn rejects_invalid_buffer_sizes() {
    assert!(Tlsm::new(TlsmConfig::new(0, 4)).is_err());
    assert!(Tlsm::new(TlsmConfig::new(4, 0)).is_err());
}

#[test]
fn average_write_amplification_rate_is_zero_before_any_cycle() {
    let t = Tlsm::new(TlsmConfig::new(2, 2)).unwrap();
    assert_eq!(t.average_write_amplification_rate(), 0.0);
}

#[test]
fn average_write_amplification_rate_tracks_trailing_window() {
    let mut config = TlsmConfig::new(2, 2);
    config.statistics_window = 1;
    let mut t = Tlsm::new(config).unwrap();

    // Cycle 1: [10,20] seq-flush (L1 = [(10,1),(20,1)]), then [5,15]
    // non-seq-flush pulls in that one tail table (2 points) and merges;
    // rate = 2 rewritten points / 4 points-in-cycle = 0.5.
    for g in [10, 20, 5, 15] {
        t.write(g);
    }
    assert_eq!(t.history_write_amp_rate(), &[0.5]);

    // Cycle 2: [30,40] seq-flush appended at the tail, then [1,2]
    // non-seq-flush pulls in BOTH tail tables (the new (30,40) run and the
    // merged (5,10,15,20) run from cycle 1, since both have max_gen > 1):
    // 2 + 4 = 6 rewritten points / 4 points-in-cycle = 1.5.
    for g in [30, 40, 1, 2] {
        t.write(g);
    }
    assert_eq!(t.history_write_amp_rate(), &[0.5, 1.5]);

    // Trailing window of 1: only the most recent cycle's rate.
    assert_eq!(t.average_write_amplification_rate(), 1.5);
}
