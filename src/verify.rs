use tracing::{info, warn};

use crate::error::Result;
use crate::histogram::RunHistogram;
use crate::reference;
use crate::runs::{self, Run};
use crate::visited::Pair;

/// 1つの法に対する検証結果
#[derive(Debug, Clone)]
pub struct VerifyResult {
    pub modulus: u32,
    /// ラン本数
    pub total_runs: u64,
    /// M²
    pub total_pairs: u64,
    /// いずれかのランが訪問したペア数（重複を除く）
    pub covered_pairs: u64,
    /// 2本以上のランで訪問されたペア数
    pub duplicate_pairs: u64,
    /// 多倍長計算と値が一致しなかったランの種
    pub mismatched_runs: Vec<Pair>,
    /// 種ペアに戻らずに終わったランの種
    pub open_runs: Vec<Pair>,
    /// (0, 1) を種とするランの長さ
    pub fibonacci_run_len: Option<usize>,
    /// 直接計算したピサノ周期
    pub pisano_period: u64,
    pub histogram: RunHistogram,
}

impl VerifyResult {
    pub fn all_ok(&self) -> bool {
        self.covered_pairs == self.total_pairs
            && self.duplicate_pairs == 0
            && self.mismatched_runs.is_empty()
            && self.open_runs.is_empty()
            && self.histogram.total_length() == self.total_pairs
            && self.fibonacci_run_len.map(|l| l as u64) == Some(self.pisano_period)
    }
}

/// ランが最後に戻ったペア
fn closing_pair(run: &Run) -> Pair {
    let v = run.values();
    match v.len() {
        0 => run.seed(),
        1 => (run.seed().1, v[0]),
        n => (v[n - 2], v[n - 1]),
    }
}

/// 法 M の全ランを列挙し、分割性・値・周期を独立に検証する。
pub fn verify_modulus(modulus: u32) -> Result<VerifyResult> {
    let all_runs = runs::collect_runs(modulus)?;
    let side = modulus as usize;
    let total_pairs = (side * side) as u64;

    let longest = all_runs.iter().map(Run::len).max().unwrap_or(0);
    let fib = reference::fibonacci_table(longest + 2);

    // VisitedSet とは別の素朴な表で数え直す
    let mut seen = vec![0u32; side * side];
    let mut mismatched_runs = Vec::new();
    let mut open_runs = Vec::new();
    let mut fibonacci_run_len = None;
    let mut histogram = RunHistogram::new();

    for run in &all_runs {
        histogram.accumulate(run);
        for (n1, n2) in run.pairs() {
            seen[n1 as usize * side + n2 as usize] += 1;
        }
        let expected = reference::reference_values(run.seed(), modulus, run.len(), &fib);
        if expected != run.values() {
            warn!(modulus, seed = ?run.seed(), "run differs from big-integer reference");
            mismatched_runs.push(run.seed());
        }
        if closing_pair(run) != run.seed() {
            open_runs.push(run.seed());
        }
        if run.seed() == (0, 1 % modulus) {
            fibonacci_run_len = Some(run.len());
        }
    }

    let covered_pairs = seen.iter().filter(|&&c| c > 0).count() as u64;
    let duplicate_pairs = seen.iter().filter(|&&c| c > 1).count() as u64;

    let result = VerifyResult {
        modulus,
        total_runs: all_runs.len() as u64,
        total_pairs,
        covered_pairs,
        duplicate_pairs,
        mismatched_runs,
        open_runs,
        fibonacci_run_len,
        pisano_period: reference::pisano_period(modulus),
        histogram,
    };
    info!(modulus, ok = result.all_ok(), runs = result.total_runs, "verified");
    Ok(result)
}
