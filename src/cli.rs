use clap::{Parser, Subcommand};
use std::path::PathBuf;

use modfibo::config::{DEFAULT_MAX_MODULUS, DEFAULT_OUTPUT_DIR, ENV_MAX_MODULUS, ENV_OUTPUT_DIR};

#[derive(Parser)]
#[command(name = "modfibo")]
#[command(version, about = "モジュロ・フィボナッチ: (a+b) mod M のラン分解")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 結果の保存先
    #[arg(long, global = true, env = ENV_OUTPUT_DIR, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// 結果をファイルに保存しない
    #[arg(long, global = true)]
    pub no_save: bool,

    /// sweep / verify で受け付ける法の上限
    #[arg(long, global = true, env = ENV_MAX_MODULUS, default_value_t = DEFAULT_MAX_MODULUS)]
    pub max_modulus: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 全ランを色付きで表示し、長さ別の本数をまとめる
    Runs {
        /// 法 M
        #[arg(default_value_t = 10, allow_negative_numbers = true)]
        base: i64,

        /// カラー出力しない
        #[arg(long)]
        no_color: bool,

        /// 表示に使う記号表（M 文字以上）
        #[arg(long)]
        alphabet: Option<String>,
    },

    /// 範囲内の全ての法を並列に集計
    Sweep {
        #[arg(allow_negative_numbers = true)]
        start: i64,

        #[arg(allow_negative_numbers = true)]
        end: i64,
    },

    /// 分割性とラン値を多倍長計算で検証
    Verify {
        #[arg(allow_negative_numbers = true)]
        base: i64,
    },
}
