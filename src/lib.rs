//! モジュロ・フィボナッチ: next = (a + b) mod M のラン分解
//!
//! [0, M) × [0, M) の全ペア (a, b) を、漸化式 (a, b) → (b, a+b mod M) の
//! 軌道（ラン）に分割して列挙する。種ペアは未訪問ペアのうち
//! 線形位置 a·M + b が最小のものを順に選ぶので、出力は常に同じ順になる。

pub mod config;
pub mod error;
pub mod histogram;
pub mod reference;
pub mod render;
pub mod runs;
pub mod sweep;
pub mod verify;
pub mod visited;

pub use config::Config;
pub use error::{check_modulus, Error, Result};
pub use histogram::RunHistogram;
pub use reference::pisano_period;
pub use render::{Alphabet, Renderer, DEFAULT_SYMBOLS};
pub use runs::{collect_runs, enumerate, step, Run, Runs};
pub use sweep::{summarize_modulus, sweep_range, sweep_range_cancellable, SweepEntry};
pub use verify::{verify_modulus, VerifyResult};
pub use visited::{FreePairs, Pair, VisitedSet};
