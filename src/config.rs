use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::error::{Error, Result};
use crate::render::Alphabet;

/// 出力先ディレクトリの環境変数
pub const ENV_OUTPUT_DIR: &str = "MODFIBO_OUTPUT";
/// sweep / verify の法の上限の環境変数
pub const ENV_MAX_MODULUS: &str = "MODFIBO_MAX_MODULUS";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MAX_MODULUS: u32 = 4096;

/// コマンド実行時の設定
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    /// 結果をファイルに保存するか
    pub save: bool,
    /// ANSI カラー出力
    pub color: bool,
    pub alphabet: Alphabet,
    /// sweep / verify で受け付ける法の上限（M² ビットのメモリを抑える）
    pub max_modulus: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            save: true,
            color: true,
            alphabet: Alphabet::default(),
            max_modulus: DEFAULT_MAX_MODULUS,
        }
    }
}

impl Config {
    /// 法の上限を確認する。
    pub fn check_cap(&self, modulus: u32) -> Result<()> {
        if modulus > self.max_modulus {
            return Err(Error::ModulusTooLarge(modulus.into()));
        }
        Ok(())
    }

    /// 出力先を作って返す。
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.as_path())
    }
}

/// 保存ファイル名に付ける時刻 (YYYYMMDD_HHMMSS)
pub fn timestamp_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// 現在時刻（ローカル）のファイル名用時刻
pub fn timestamp() -> String {
    timestamp_at(&Local::now())
}
