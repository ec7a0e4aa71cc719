//! ラン列挙。
//!
//! 未訪問ペアのうち位置が最小のものを種として next = (n1 + n2) mod M を
//! 歩き、訪問済みペアに戻ったところで1本のランとして返す。歩いたペアは
//! すべて訪問済みになるので、全ランで M×M のペア空間がちょうど分割される。

use std::iter::FusedIterator;

use tracing::{debug, info};

use crate::error::Result;
use crate::visited::{FreePairs, Pair, VisitedSet};

/// 1本のラン: 種ペアと、そこから生成された後続値の列。
/// 種ペア自身の2値は values に含まない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    seed: Pair,
    values: Vec<u32>,
}

impl Run {
    #[inline]
    pub fn seed(&self) -> Pair {
        self.seed
    }

    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// ステップ数。周期と等しい。
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 常に false（ランは最低1ステップ）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// このランが訪問済みにしたペアを歩いた順に返す（種を含む）。
    /// 最後の値で戻った訪問済みペアは含まない。
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        let body = &self.values[..self.values.len().saturating_sub(1)];
        let mut prev = self.seed;
        std::iter::once(self.seed).chain(body.iter().map(move |&v| {
            prev = (prev.1, v);
            prev
        }))
    }
}

/// 漸化式の1ステップ (n1 + n2) mod M
#[inline]
pub fn step(n1: u32, n2: u32, modulus: u32) -> u32 {
    ((n1 as u64 + n2 as u64) % modulus as u64) as u32
}

/// 全ランを種の位置順に返すイテレータ。訪問集合を単独で所有する。
#[derive(Debug, Clone)]
pub struct Runs {
    modulus: u32,
    visited: VisitedSet,
    cursor: FreePairs,
    emitted: usize,
}

impl Runs {
    pub fn new(modulus: u32) -> Result<Self> {
        Ok(Runs {
            modulus,
            visited: VisitedSet::new(modulus)?,
            cursor: FreePairs::new(),
            emitted: 0,
        })
    }

    #[inline]
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// ここまでの訪問状態
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// 種から訪問済みペアに戻るまで歩く。
    fn walk(&mut self, seed: Pair) -> Run {
        let m = self.modulus;
        let (mut n1, mut n2) = seed;

        // カーソルは未訪問ペアしか返さない
        let seed_was_visited = self.visited.visit_and_check(n1, n2);
        debug_assert!(!seed_was_visited, "seed {:?} already visited", seed);

        let mut values = Vec::new();
        loop {
            let next = step(n1, n2, m);
            n1 = n2;
            n2 = next;
            values.push(next);
            if self.visited.visit_and_check(n1, n2) {
                break;
            }
        }
        Run { seed, values }
    }
}

impl Iterator for Runs {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let seed = self.cursor.next_free_pair(&self.visited)?;
        let run = self.walk(seed);
        self.emitted += 1;
        debug!(modulus = self.modulus, seed = ?seed, len = run.len(), "run");
        if self.visited.is_complete() {
            info!(
                modulus = self.modulus,
                runs = self.emitted,
                pairs = self.visited.capacity(),
                "enumeration complete"
            );
        }
        Some(run)
    }
}

impl FusedIterator for Runs {}

/// 法 M の全ランを遅延列挙する。
pub fn enumerate(modulus: u32) -> Result<Runs> {
    Runs::new(modulus)
}

/// 法 M の全ランを Vec に集める。
pub fn collect_runs(modulus: u32) -> Result<Vec<Run>> {
    Ok(enumerate(modulus)?.collect())
}
