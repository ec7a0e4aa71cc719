//! ランの表示。値 v を記号表の v 文字目に置き換え、種の先頭値をマゼンタ、
//! 続く周期をシアンで出力する。
//!
//! ランの値は最後に種ペアへ戻って終わるので、末尾の1値は種の2値目の
//! 繰り返しになる。表示では種の2値目から始めて末尾の1値を落とし、
//! 1行がちょうど 1 + 周期 文字（種の先頭値が最後にもう一度現れる）になる。

use std::collections::HashSet;
use std::io::{self, Write};

use colored::Colorize;

use crate::error::{Error, Result};
use crate::runs::Run;

/// 既定の記号表（92文字）
pub const DEFAULT_SYMBOLS: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_/+=!?@#$%^&*;,.:\"'\\`~(){}<>|";

/// 値 → 表示記号の表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet { symbols: DEFAULT_SYMBOLS.chars().collect() }
    }
}

impl Alphabet {
    /// 空、または重複記号を含む表は拒否する。
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(Error::InvalidAlphabet("空の記号表".to_string()));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for &c in &symbols {
            if !seen.insert(c) {
                return Err(Error::InvalidAlphabet(format!("記号 {:?} が重複している", c)));
            }
        }
        Ok(Alphabet { symbols })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbol(&self, value: u32) -> Option<char> {
        self.symbols.get(value as usize).copied()
    }

    /// 法 M の全値 0..M を表せるか
    pub fn check_covers(&self, modulus: u32) -> Result<()> {
        if (modulus as usize) > self.symbols.len() {
            return Err(Error::AlphabetTooSmall { modulus, symbols: self.symbols.len() });
        }
        Ok(())
    }

    /// ランを (種の先頭値, 続く周期) の記号列に分ける。
    pub fn display_parts(&self, run: &Run) -> (String, String) {
        let (a, b) = run.seed();
        let values = run.values();
        let body = &values[..values.len().saturating_sub(1)];
        let mut tail = String::with_capacity(values.len());
        tail.push(self.symbol(b).unwrap_or('?'));
        tail.push_str(&self.encode(body));
        (self.encode(&[a]), tail)
    }

    /// 値列を記号列に。表にない値は '?'。
    pub fn encode(&self, values: &[u32]) -> String {
        values.iter().map(|&v| self.symbol(v).unwrap_or('?')).collect()
    }
}

/// 1回の実行ごとに作る表示器
#[derive(Debug, Clone)]
pub struct Renderer {
    alphabet: Alphabet,
    color: bool,
}

impl Renderer {
    pub fn new(alphabet: Alphabet, color: bool) -> Self {
        Renderer { alphabet, color }
    }

    /// 記号表が法 M を覆うことを確認してから作る。
    pub fn for_modulus(alphabet: Alphabet, color: bool, modulus: u32) -> Result<Self> {
        alphabet.check_covers(modulus)?;
        Ok(Renderer::new(alphabet, color))
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// 種の先頭値 + 周期を1行の文字列に
    pub fn render_run(&self, run: &Run) -> String {
        let (seed, body) = self.alphabet.display_parts(run);
        if self.color {
            format!("{}{}", seed.magenta().bold(), body.cyan())
        } else {
            format!("{}{}", seed, body)
        }
    }

    pub fn write_run(&self, out: &mut impl Write, run: &Run) -> io::Result<()> {
        writeln!(out, "{}", self.render_run(run))
    }
}
