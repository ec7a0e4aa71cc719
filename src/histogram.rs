use std::collections::BTreeMap;

use num_integer::Integer;

use crate::runs::Run;

/// ラン長ごとの本数（長さの昇順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunHistogram {
    counts: BTreeMap<usize, u64>,
}

impl RunHistogram {
    pub fn new() -> Self {
        RunHistogram { counts: BTreeMap::new() }
    }

    pub fn from_runs<'a>(runs: impl IntoIterator<Item = &'a Run>) -> Self {
        let mut hist = RunHistogram::new();
        for run in runs {
            hist.accumulate(run);
        }
        hist
    }

    /// 1本のランを集約
    #[inline]
    pub fn accumulate(&mut self, run: &Run) {
        self.add_length(run.len());
    }

    #[inline]
    pub fn add_length(&mut self, len: usize) {
        *self.counts.entry(len).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &RunHistogram) {
        for (&len, &count) in &other.counts {
            *self.counts.entry(len).or_insert(0) += count;
        }
    }

    /// (長さ, 本数) を長さの昇順で
    pub fn entries(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&len, &count)| (len, count))
    }

    pub fn count_of(&self, len: usize) -> u64 {
        self.counts.get(&len).copied().unwrap_or(0)
    }

    pub fn total_runs(&self) -> u64 {
        self.counts.values().sum()
    }

    /// 全ランの長さの和。完全な列挙なら M² に等しい。
    pub fn total_length(&self) -> u64 {
        self.counts.iter().map(|(&len, &count)| len as u64 * count).sum()
    }

    pub fn longest(&self) -> Option<usize> {
        self.counts.keys().next_back().copied()
    }

    pub fn shortest(&self) -> Option<usize> {
        self.counts.keys().next().copied()
    }

    /// 全ラン長の最小公倍数 = ペア写像 (a, b) → (b, a+b) の周期
    pub fn common_period(&self) -> u64 {
        self.counts.keys().fold(1u64, |acc, &len| acc.lcm(&(len as u64)))
    }

    /// "12 of 3; 1 of 8" 形式の1行
    pub fn histogram_line(&self) -> String {
        self.entries()
            .map(|(len, count)| format!("{} of {}", count, len))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// 表示用サマリー: 本数の行とヒストグラムの行
    pub fn summary_lines(&self) -> [String; 2] {
        [format!("{} sequences.", self.total_runs()), self.histogram_line()]
    }
}
