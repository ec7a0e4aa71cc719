use thiserror::Error;

/// modfibo のエラー型
#[derive(Error, Debug)]
pub enum Error {
    /// M ≤ 0
    #[error("法 M は正の整数であること: {0}")]
    InvalidModulus(i64),

    /// M² が usize に収まらない、または呼び出し側の上限を超えた
    #[error("法 M が大きすぎる: {0}")]
    ModulusTooLarge(i64),

    #[error("Settle down! 記号表は {symbols} 文字しかないので M={modulus} は表示できない")]
    AlphabetTooSmall { modulus: u32, symbols: usize },

    #[error("記号表が不正: {0}")]
    InvalidAlphabet(String),

    #[error("範囲が不正: [{start}, {end}]")]
    InvalidRange { start: u32, end: u32 },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// 符号付き入力を法 M として検査する。
pub fn check_modulus(m: i64) -> Result<u32> {
    if m <= 0 {
        return Err(Error::InvalidModulus(m));
    }
    u32::try_from(m).map_err(|_| Error::ModulusTooLarge(m))
}
