//! ペア訪問集合。
//!
//! M×M 個のペア (n1, n2) を1ビットずつ u64 ワードにパックして保持する。
//! ペアの線形位置は pos = n1 * M + n2（行優先）。ワード w のビット b が
//! pos = 64w + b に対応する。
//!
//! 未訪問ペアの探索はワード単位: 反転したワードの trailing_zeros で
//! 最初の 0 ビットを求めるので、訪問済み領域は64ペアずつ読み飛ばせる。

use crate::error::{Error, Result};

/// 漸化式の状態（直前の2値）
pub type Pair = (u32, u32);

/// 訪問済みペアのビット集合。一度立ったビットは戻らない。
#[derive(Debug, Clone)]
pub struct VisitedSet {
    words: Vec<u64>,
    side: u32,
    /// side² (有効ビット数)
    capacity: usize,
    /// 立っているビット数
    visited: usize,
}

impl VisitedSet {
    /// side² 個のペアを持つ空集合を作る。
    pub fn new(side: u32) -> Result<Self> {
        if side == 0 {
            return Err(Error::InvalidModulus(0));
        }
        let capacity = (side as usize)
            .checked_mul(side as usize)
            .ok_or(Error::ModulusTooLarge(side.into()))?;
        Ok(VisitedSet {
            words: vec![0u64; capacity.div_ceil(64)],
            side,
            capacity,
            visited: 0,
        })
    }

    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// 全ペア数 side²
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.visited == self.capacity
    }

    /// (n1, n2) → 線形位置。範囲外は不変条件違反なので panic。
    #[inline]
    pub fn pos(&self, n1: u32, n2: u32) -> usize {
        assert!(
            n1 < self.side && n2 < self.side,
            "pair ({}, {}) out of range for side {}",
            n1, n2, self.side
        );
        n1 as usize * self.side as usize + n2 as usize
    }

    /// 線形位置 → (n1, n2)。範囲外は panic。
    #[inline]
    pub fn pair_at(&self, pos: usize) -> Pair {
        assert!(
            pos < self.capacity,
            "position {} out of range for side {}",
            pos, self.side
        );
        let side = self.side as usize;
        ((pos / side) as u32, (pos % side) as u32)
    }

    #[inline]
    pub fn is_visited(&self, n1: u32, n2: u32) -> bool {
        let pos = self.pos(n1, n2);
        (self.words[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// 呼び出し前に訪問済みだったかを返し、その後ペアを訪問済みにする。
    #[inline]
    pub fn visit_and_check(&mut self, n1: u32, n2: u32) -> bool {
        let pos = self.pos(n1, n2);
        let mask = 1u64 << (pos % 64);
        let word = &mut self.words[pos / 64];
        let was_visited = *word & mask != 0;
        *word |= mask;
        if !was_visited {
            self.visited += 1;
        }
        was_visited
    }

    /// 位置 from 以上で最初の未訪問位置。
    ///
    /// 毎回その時点のビット列を読むので、前回の呼び出し以降に
    /// 立てられたビットも反映される。
    pub fn next_free(&self, from: usize) -> Option<usize> {
        if from >= self.capacity {
            return None;
        }
        let mut w = from / 64;
        // from 未満のビットは訪問済み扱いにして除外
        let mut free = !self.words[w] & (u64::MAX << (from % 64));
        loop {
            if free != 0 {
                let pos = w * 64 + free.trailing_zeros() as usize;
                // 最上位ワードの余剰ビットは常に 0 なので capacity で打ち切る
                return (pos < self.capacity).then_some(pos);
            }
            w += 1;
            if w >= self.words.len() {
                return None;
            }
            free = !self.words[w];
        }
    }

    /// 未訪問ペアを位置の昇順に列挙する（読み取り専用）。
    ///
    /// 列挙中に集合を更新する呼び出し側は [`FreePairs`] を使うこと。
    pub fn free_pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        let mut cursor = FreePairs::new();
        std::iter::from_fn(move || cursor.next_free_pair(self))
    }
}

/// 集合を借用しない未訪問ペアのカーソル。
///
/// 位置だけを保持し、`next_free_pair` のたびに渡された集合の現在の状態を
/// 読み直す。取り出しの合間に集合へ訪問を書き込んでよい。
#[derive(Debug, Clone, Default)]
pub struct FreePairs {
    cursor: usize,
}

impl FreePairs {
    pub fn new() -> Self {
        FreePairs { cursor: 0 }
    }

    /// 現在のカーソル以上で最初の未訪問ペアを返し、その次へ進む。
    pub fn next_free_pair(&mut self, set: &VisitedSet) -> Option<Pair> {
        let pos = set.next_free(self.cursor)?;
        self.cursor = pos + 1;
        Some(set.pair_at(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(VisitedSet::new(0), Err(Error::InvalidModulus(0))));
    }

    #[test]
    fn test_new_is_empty() {
        let set = VisitedSet::new(9).unwrap();
        assert_eq!(set.capacity(), 81);
        assert_eq!(set.visited_count(), 0);
        assert!(!set.is_complete());
        assert_eq!(set.free_pairs().count(), 81);
    }

    #[test]
    fn test_visit_and_check_idempotent() {
        let mut set = VisitedSet::new(5).unwrap();
        assert!(!set.visit_and_check(2, 3));
        assert!(set.visit_and_check(2, 3));
        assert!(set.visit_and_check(2, 3));
        assert_eq!(set.visited_count(), 1);
        assert!(set.is_visited(2, 3));
        assert!(!set.is_visited(3, 2));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let mut set = VisitedSet::new(4).unwrap();
        set.visit_and_check(4, 0);
    }

    #[test]
    #[should_panic]
    fn test_pair_at_out_of_range_panics() {
        let set = VisitedSet::new(4).unwrap();
        set.pair_at(16);
    }

    #[test]
    fn test_pos_row_major() {
        let set = VisitedSet::new(7).unwrap();
        assert_eq!(set.pos(0, 0), 0);
        assert_eq!(set.pos(0, 6), 6);
        assert_eq!(set.pos(1, 0), 7);
        assert_eq!(set.pos(6, 6), 48);
        assert_eq!(set.pair_at(23), (3, 2));
    }

    #[test]
    fn test_free_pairs_ascending() {
        let mut set = VisitedSet::new(3).unwrap();
        set.visit_and_check(0, 0);
        set.visit_and_check(1, 1);
        set.visit_and_check(2, 2);
        let free: Vec<Pair> = set.free_pairs().collect();
        assert_eq!(free, vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_next_free_crosses_words() {
        // 13² = 169 ビット = 3ワード
        let mut set = VisitedSet::new(13).unwrap();
        for pos in 0..150 {
            let (n1, n2) = set.pair_at(pos);
            set.visit_and_check(n1, n2);
        }
        assert_eq!(set.next_free(0), Some(150));
        assert_eq!(set.next_free(160), Some(160));
        assert_eq!(set.next_free(169), None);
    }

    #[test]
    fn test_next_free_ignores_padding_bits() {
        // 3² = 9 ビット、残り55ビットは余剰
        let mut set = VisitedSet::new(3).unwrap();
        for n1 in 0..3 {
            for n2 in 0..3 {
                set.visit_and_check(n1, n2);
            }
        }
        assert!(set.is_complete());
        assert_eq!(set.next_free(0), None);
        assert_eq!(set.free_pairs().count(), 0);
    }

    #[test]
    fn test_cursor_sees_live_state() {
        let mut set = VisitedSet::new(4).unwrap();
        let mut cursor = FreePairs::new();

        assert_eq!(cursor.next_free_pair(&set), Some((0, 0)));
        // カーソル作成後に立てたビットが読み飛ばされること
        set.visit_and_check(0, 1);
        set.visit_and_check(0, 2);
        set.visit_and_check(1, 0);
        assert_eq!(cursor.next_free_pair(&set), Some((0, 3)));
        set.visit_and_check(1, 1);
        assert_eq!(cursor.next_free_pair(&set), Some((1, 2)));
    }

    #[test]
    fn test_cursor_terminates() {
        let mut set = VisitedSet::new(2).unwrap();
        let mut cursor = FreePairs::new();
        while let Some((n1, n2)) = cursor.next_free_pair(&set) {
            assert!(!set.visit_and_check(n1, n2));
        }
        assert!(set.is_complete());
        assert_eq!(cursor.next_free_pair(&set), None);
    }
}
