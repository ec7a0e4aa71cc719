use modfibo::*;

/// 大きい法での分割・被覆の検証ヘルパー
fn verify_large(m: u32) {
    let mut runs = enumerate(m).unwrap();
    let mut hist = RunHistogram::new();
    for run in runs.by_ref() {
        assert!(!run.is_empty());
        assert!(run.values().iter().all(|&v| v < m));
        hist.accumulate(&run);
    }
    let pairs = m as u64 * m as u64;
    assert!(runs.visited().is_complete(), "M={} incomplete", m);
    assert_eq!(runs.visited().visited_count() as u64, pairs);
    assert_eq!(hist.total_length(), pairs, "run lengths do not sum to M² for M={}", m);
}

#[test]
fn test_m90() {
    verify_large(90);
    let hist = RunHistogram::from_runs(&collect_runs(90).unwrap());
    assert_eq!(hist.total_runs(), 132);
    assert_eq!(hist.longest(), Some(120));
    assert_eq!(hist.count_of(24), 65);
}

#[test]
fn test_m256() {
    verify_large(256);
    let hist = RunHistogram::from_runs(&collect_runs(256).unwrap());
    assert_eq!(hist.total_runs(), 256);
    assert_eq!(hist.longest(), Some(384));
    assert_eq!(hist.count_of(384), 128);
}

#[test]
fn test_m1000() {
    verify_large(1000);
}

#[test]
fn test_m1031_prime() {
    verify_large(1031);
}

#[test]
fn test_sweep_1_to_200() {
    let entries = sweep_range(1, 200, |_, _| {}).unwrap();
    assert_eq!(entries.len(), 200);
    for e in &entries {
        let m = e.modulus as u64;
        assert_eq!(e.histogram.total_length(), m * m, "M={}", m);
        assert_eq!(e.pisano_period, pisano_period(e.modulus), "M={}", m);
        // ピサノ周期は 6M 以下
        assert!(e.pisano_period <= 6 * m);
    }
}

#[test]
fn test_verify_large() {
    let result = verify_modulus(500).unwrap();
    assert!(result.all_ok());
    assert_eq!(result.covered_pairs, 250_000);
}
