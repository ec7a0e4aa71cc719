//! 複数の法の一括列挙。
//!
//! 法ごとに独立した列挙（訪問集合も別）を Rayon で並列に走らせる。
//! 1つの列挙の中は逐次のままなので、訪問集合の単一書き手の前提は崩れない。

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::info;

use crate::error::{Error, Result};
use crate::histogram::RunHistogram;
use crate::runs;

/// 1つの法の集計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepEntry {
    pub modulus: u32,
    pub histogram: RunHistogram,
    /// (0, 1) を含むランの長さ
    pub pisano_period: u64,
}

impl SweepEntry {
    pub fn total_runs(&self) -> u64 {
        self.histogram.total_runs()
    }

    pub fn longest(&self) -> usize {
        self.histogram.longest().unwrap_or(0)
    }
}

/// 法 M を列挙してランを保持せずに集計する。
pub fn summarize_modulus(modulus: u32) -> Result<SweepEntry> {
    let fibonacci_seed = (0, 1 % modulus);
    let mut histogram = RunHistogram::new();
    let mut pisano_period = 0u64;
    for run in runs::enumerate(modulus)? {
        if run.seed() == fibonacci_seed {
            pisano_period = run.len() as u64;
        }
        histogram.accumulate(&run);
    }
    Ok(SweepEntry { modulus, histogram, pisano_period })
}

fn check_range(start: u32, end: u32) -> Result<()> {
    if start == 0 {
        return Err(Error::InvalidModulus(0));
    }
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }
    Ok(())
}

/// [start, end] の全ての法を並列に集計する（法の昇順で返す）。
/// progress_callback: (完了数, 総数) を法1つごとに呼ぶ（スレッドセーフ）。
pub fn sweep_range(
    start: u32,
    end: u32,
    progress_callback: impl Fn(u64, u64) + Sync,
) -> Result<Vec<SweepEntry>> {
    let never = AtomicBool::new(false);
    sweep_range_cancellable(start, end, &never, progress_callback)
}

/// キャンセル可能な並列集計。cancel が true になると、それまでに
/// 終わった法だけを返す。
pub fn sweep_range_cancellable(
    start: u32,
    end: u32,
    cancel: &AtomicBool,
    progress_callback: impl Fn(u64, u64) + Sync,
) -> Result<Vec<SweepEntry>> {
    check_range(start, end)?;
    let total = (end - start) as u64 + 1;
    let done = AtomicU64::new(0);

    let entries: Vec<Option<Result<SweepEntry>>> = (start..=end)
        .into_par_iter()
        .map(|m| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let entry = summarize_modulus(m);
            let d = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress_callback(d, total);
            Some(entry)
        })
        .collect();

    let entries = entries.into_iter().flatten().collect::<Result<Vec<_>>>()?;
    info!(start, end, completed = entries.len(), "sweep finished");
    Ok(entries)
}
