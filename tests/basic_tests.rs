use modfibo::*;
use std::collections::HashSet;

/// 全ランが訪問したペアを集め、重複なく M² 個になることを検証するヘルパー
fn verify_partition(m: u32) {
    let runs = collect_runs(m).unwrap();
    let mut seen: HashSet<Pair> = HashSet::new();
    for run in &runs {
        for pair in run.pairs() {
            assert!(pair.0 < m && pair.1 < m, "pair {:?} out of range for M={}", pair, m);
            assert!(seen.insert(pair), "pair {:?} visited twice for M={}", pair, m);
        }
    }
    assert_eq!(seen.len(), (m * m) as usize, "partition incomplete for M={}", m);
}

/// 各ランを種から再計算して一致を確認するヘルパー
fn verify_no_drift(m: u32) {
    for run in collect_runs(m).unwrap() {
        let (mut p1, mut p2) = run.seed();
        for (i, &v) in run.values().iter().enumerate() {
            assert_eq!(v, (p1 + p2) % m, "drift at step {} of run {:?}, M={}", i + 1, run.seed(), m);
            p1 = p2;
            p2 = v;
        }
    }
}

// ===== 境界 =====

#[test]
fn test_m1_single_run() {
    let runs = collect_runs(1).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].values(), &[0]);
}

#[test]
fn test_m2_literal_trace() {
    let runs: Vec<(Pair, Vec<u32>)> = collect_runs(2)
        .unwrap()
        .into_iter()
        .map(|r| (r.seed(), r.values().to_vec()))
        .collect();
    assert_eq!(runs, vec![((0, 0), vec![0]), ((0, 1), vec![1, 0, 1])]);
}

#[test]
fn test_m3_partition() {
    let expected: HashSet<Pair> = [
        (0, 0), (0, 1), (0, 2),
        (1, 0), (1, 1), (1, 2),
        (2, 0), (2, 1), (2, 2),
    ]
    .into_iter()
    .collect();

    let mut seen = Vec::new();
    for run in collect_runs(3).unwrap() {
        seen.extend(run.pairs());
    }
    assert_eq!(seen.len(), 9);
    let seen: HashSet<Pair> = seen.into_iter().collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_invalid_modulus() {
    assert!(matches!(enumerate(0), Err(Error::InvalidModulus(0))));
    assert!(matches!(VisitedSet::new(0), Err(Error::InvalidModulus(0))));
    assert!(matches!(check_modulus(-3), Err(Error::InvalidModulus(-3))));
}

// ===== 不変条件 =====

#[test]
fn test_partition_1_to_60() {
    for m in 1..=60 {
        verify_partition(m);
    }
}

#[test]
fn test_no_drift_1_to_60() {
    for m in 1..=60 {
        verify_no_drift(m);
    }
}

#[test]
fn test_coverage_count() {
    // visit_and_check が「未訪問」を返した回数 = M²
    for m in [1u32, 2, 5, 16, 31, 90] {
        let mut runs = enumerate(m).unwrap();
        let total_len: usize = runs.by_ref().map(|r| r.len()).sum();
        assert_eq!(runs.visited().visited_count(), (m * m) as usize);
        assert!(runs.visited().is_complete());
        assert_eq!(total_len, (m * m) as usize);
    }
}

#[test]
fn test_determinism() {
    for m in [7u32, 10, 64, 90] {
        assert_eq!(collect_runs(m).unwrap(), collect_runs(m).unwrap());
    }
}

#[test]
fn test_seeds_ascending() {
    for m in [6u32, 10, 25] {
        let seeds: Vec<usize> = collect_runs(m)
            .unwrap()
            .iter()
            .map(|r| r.seed().0 as usize * m as usize + r.seed().1 as usize)
            .collect();
        assert!(seeds.windows(2).all(|w| w[0] < w[1]), "seeds not ascending for M={}", m);
        assert_eq!(seeds[0], 0);
    }
}

#[test]
fn test_seed_is_lowest_free_pair() {
    // 各ランの種は、それ以前のランが訪問していない最小位置のペア
    let m = 12u32;
    let mut visited = VisitedSet::new(m).unwrap();
    for run in collect_runs(m).unwrap() {
        let lowest = visited.free_pairs().next().unwrap();
        assert_eq!(run.seed(), lowest);
        for (n1, n2) in run.pairs() {
            assert!(!visited.visit_and_check(n1, n2));
        }
    }
    assert!(visited.is_complete());
}

#[test]
fn test_runs_close_on_seed() {
    // 写像 (a, b) → (b, a+b) は全単射なので、各ランは自分の種に戻る
    for m in 1..=40u32 {
        for run in collect_runs(m).unwrap() {
            let v = run.values();
            let closing = if v.len() == 1 {
                (run.seed().1, v[0])
            } else {
                (v[v.len() - 2], v[v.len() - 1])
            };
            assert_eq!(closing, run.seed(), "run {:?} of M={} does not close on its seed", run.seed(), m);
        }
    }
}

// ===== 集約・表示 =====

#[test]
fn test_histogram_summary_m3() {
    let runs = collect_runs(3).unwrap();
    let hist = RunHistogram::from_runs(&runs);
    assert_eq!(hist.summary_lines(), ["2 sequences.".to_string(), "1 of 1; 1 of 8".to_string()]);
}

#[test]
fn test_render_does_not_alter_runs() {
    let runs = collect_runs(10).unwrap();
    let before = runs.clone();
    let renderer = Renderer::for_modulus(Alphabet::default(), false, 10).unwrap();
    let lines: Vec<String> = runs.iter().map(|r| renderer.render_run(r)).collect();
    assert_eq!(runs, before);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "00");
    // 0 1 1 2 3 5 8 3 1 4 ...
    assert!(lines[1].starts_with("0112358314"));
    assert_eq!(lines[1].len(), 61);
}
