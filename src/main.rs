use anyhow::{Context, Result};
use clap::Parser;
use modfibo::config::timestamp;
use modfibo::{
    check_modulus, enumerate, sweep_range, verify_modulus, Alphabet, Config, Renderer, RunHistogram,
};
use std::fs::File;
use std::io::{BufWriter, Write as IoWrite};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

use cli::{Cli, Commands};

fn init_tracing() {
    // stdout はラン表示専用なのでログは stderr へ
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn enable_ansi() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
}

fn output_path(config: &Config, filename: String) -> Result<PathBuf> {
    let dir = config
        .ensure_output_dir()
        .with_context(|| format!("出力先を作成できません: {}", config.output_dir.display()))?;
    Ok(dir.join(filename))
}

fn main() {
    init_tracing();
    enable_ansi();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("エラー: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config {
        output_dir: cli.output,
        save: !cli.no_save,
        max_modulus: cli.max_modulus,
        ..Config::default()
    };

    match cli.command {
        Commands::Runs { base, no_color, alphabet } => {
            config.color = !no_color;
            if let Some(symbols) = alphabet {
                config.alphabet = Alphabet::new(&symbols)?;
            }
            cmd_runs(&config, base)
        }
        Commands::Sweep { start, end } => cmd_sweep(&config, start, end),
        Commands::Verify { base } => cmd_verify(&config, base),
    }
}

fn cmd_runs(config: &Config, base: i64) -> Result<()> {
    let m = check_modulus(base)?;
    let renderer = Renderer::for_modulus(config.alphabet.clone(), config.color, m)?;
    let plain = Renderer::new(config.alphabet.clone(), false);

    let timer = Instant::now();
    let mut histogram = RunHistogram::new();
    let mut saved_lines = Vec::new();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for run in enumerate(m)? {
        renderer.write_run(&mut out, &run)?;
        if config.save {
            saved_lines.push(plain.render_run(&run));
        }
        histogram.accumulate(&run);
    }
    for line in histogram.summary_lines() {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    let elapsed = timer.elapsed();
    tracing::info!(modulus = m, ?elapsed, "runs printed");

    if config.save {
        let path = output_path(config, format!("runs_m{}_{}.txt", m, timestamp()))?;
        let mut f = BufWriter::new(File::create(&path)?);
        writeln!(f, "# modfibo runs")?;
        writeln!(f, "modulus = {}", m)?;
        for line in &saved_lines {
            writeln!(f, "{}", line)?;
        }
        for line in histogram.summary_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "common_period = {}", histogram.common_period())?;
        writeln!(f, "elapsed = {:?}", elapsed)?;
        f.flush()?;
        eprintln!("保存: {}", path.display());
    }
    Ok(())
}

fn cmd_sweep(config: &Config, start: i64, end: i64) -> Result<()> {
    let start = check_modulus(start)?;
    let end = check_modulus(end)?;
    config.check_cap(end)?;

    let num_threads = rayon::current_num_threads();
    println!("一括集計: M = {}..={}", start, end);
    println!("({}スレッド並列)", num_threads);
    println!();

    let timer = Instant::now();
    let last_print = Mutex::new(Instant::now());
    let entries = sweep_range(start, end, |done, total| {
        let now = Instant::now();
        if let Ok(mut lp) = last_print.try_lock() {
            if now.duration_since(*lp).as_millis() >= 500 || done == total {
                let elapsed = timer.elapsed();
                let pct = done as f64 / total as f64 * 100.0;
                eprint!(
                    "\x1b[2K\r  [{:.1}s] {}/{} ({:.1}%)",
                    elapsed.as_secs_f64(), done, total, pct
                );
                *lp = now;
            }
        }
    })?;
    let elapsed = timer.elapsed();
    eprintln!();

    println!(
        "  {:>6}  {:>6}  {:>7}  {:>7}  {:>14}  ヒストグラム",
        "M", "ラン数", "最長", "ピサノ", "共通周期"
    );
    for e in &entries {
        println!(
            "  {:>6}  {:>6}  {:>7}  {:>7}  {:>14}  {}",
            e.modulus,
            e.total_runs(),
            e.longest(),
            e.pisano_period,
            e.histogram.common_period(),
            e.histogram.histogram_line()
        );
    }
    println!();
    println!("計算時間 = {:?}", elapsed);

    if config.save {
        let path = output_path(config, format!("sweep_{}-{}_{}.csv", start, end, timestamp()))?;
        let mut w = BufWriter::new(File::create(&path)?);
        writeln!(w, "modulus,runs,longest,pisano_period,common_period,histogram")?;
        for e in &entries {
            writeln!(
                w,
                "{},{},{},{},{},\"{}\"",
                e.modulus,
                e.total_runs(),
                e.longest(),
                e.pisano_period,
                e.histogram.common_period(),
                e.histogram.histogram_line()
            )?;
        }
        w.flush()?;
        println!("\n保存: {}", path.display());
    }
    Ok(())
}

fn cmd_verify(config: &Config, base: i64) -> Result<()> {
    let m = check_modulus(base)?;
    config.check_cap(m)?;

    println!("検証: M = {}", m);
    let timer = Instant::now();
    let result = verify_modulus(m)?;
    let elapsed = timer.elapsed();

    let yes_no = |b: bool| if b { "はい" } else { "いいえ" };
    println!();
    println!("--- 結果 ---");
    println!("ラン数              = {}", result.total_runs);
    println!("ペア総数 (M²)       = {}", result.total_pairs);
    println!("訪問されたペア      = {}", result.covered_pairs);
    println!("重複訪問ペア        = {}", result.duplicate_pairs);
    println!("ラン長の総和        = {}", result.histogram.total_length());
    println!("値の不一致          = {} 本", result.mismatched_runs.len());
    println!("閉じないラン        = {} 本", result.open_runs.len());
    println!(
        "(0,1) のラン長      = {}",
        result.fibonacci_run_len.map_or("-".to_string(), |l| l.to_string())
    );
    println!("ピサノ周期 π(M)     = {}", result.pisano_period);
    println!("共通周期            = {}", result.histogram.common_period());
    println!("全て一致            = {}", yes_no(result.all_ok()));
    println!("計算時間            = {:?}", elapsed);

    for seed in result.mismatched_runs.iter().take(10) {
        println!("  不一致: 種 ({}, {})", seed.0, seed.1);
    }

    if config.save {
        let path = output_path(config, format!("verify_m{}_{}.txt", m, timestamp()))?;
        let mut f = BufWriter::new(File::create(&path)?);
        writeln!(f, "# modfibo verify")?;
        writeln!(f, "modulus = {}", m)?;
        writeln!(f, "total_runs = {}", result.total_runs)?;
        writeln!(f, "total_pairs = {}", result.total_pairs)?;
        writeln!(f, "covered_pairs = {}", result.covered_pairs)?;
        writeln!(f, "duplicate_pairs = {}", result.duplicate_pairs)?;
        writeln!(f, "mismatched_runs = {}", result.mismatched_runs.len())?;
        writeln!(f, "open_runs = {}", result.open_runs.len())?;
        writeln!(f, "pisano_period = {}", result.pisano_period)?;
        writeln!(f, "common_period = {}", result.histogram.common_period())?;
        writeln!(f, "histogram = {}", result.histogram.histogram_line())?;
        writeln!(f, "all_ok = {}", result.all_ok())?;
        writeln!(f, "elapsed = {:?}", elapsed)?;
        f.flush()?;
        println!("\n保存: {}", path.display());
    }

    if !result.all_ok() {
        anyhow::bail!("M={} の検証に失敗", m);
    }
    Ok(())
}
