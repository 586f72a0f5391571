//! ELS scan tool
//!
//! Runs one keyword search over a text file and prints either the ranked
//! significance reports or the raw matches, with timing.
//!
//! ## Usage
//!
//! ```bash
//! # Full sweep, ranked
//! ./target/release/els_scan genesis.txt תורה
//!
//! # One skip, forward only, unscored
//! ./target/release/els_scan genesis.txt תורה --skip 50 --direction forward --plain
//!
//! # Skip taken from the weight of a seed word
//! ./target/release/els_scan genesis.txt תורה --seed אמת
//!
//! # Bigger texts: cap the sweep and use every core
//! ./target/release/els_scan torah.txt משה --max-skip 5000 --max-matches 0 --parallel
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use els_core::scoring::Lexicon;
use els_core::{ElsEngine, LetterGraph, SearchRequest};
use els_types::{Direction, ElsError, SweepConfig, DEFAULT_MATCH_BUDGET};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Search a text for equidistant letter sequences of a keyword.
#[derive(Parser, Debug)]
#[command(name = "els_scan", version)]
struct Args {
    /// UTF-8 text file to search
    path: PathBuf,

    /// Keyword to look for
    keyword: String,

    /// Scan only this skip
    #[arg(long)]
    skip: Option<usize>,

    /// Scan only the skip equal to this word's letter weight
    #[arg(long, conflicts_with = "skip")]
    seed: Option<String>,

    /// Reading direction
    #[arg(long, default_value = "both", value_parser = ["forward", "backward", "both"])]
    direction: String,

    /// Largest skip swept (default: half the letter count)
    #[arg(long)]
    max_skip: Option<usize>,

    /// Stop after this many matches (0 = no limit)
    #[arg(long, default_value_t = DEFAULT_MATCH_BUDGET)]
    max_matches: usize,

    /// Stop after this many milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Sweep skips on all cores
    #[arg(long)]
    parallel: bool,

    /// Lexicon JSON file (default: bundled list)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Print raw matches without scoring
    #[arg(long)]
    plain: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Maximum rows printed
    #[arg(long, default_value = "25")]
    top: usize,
}

fn main() -> Result<(), ElsError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let lexicon = match &args.lexicon {
        Some(path) => Lexicon::from_path(path)?,
        None => Lexicon::bundled(),
    };
    let engine = ElsEngine::new(LetterGraph::hebrew()).with_lexicon(lexicon);

    println!("Loading file...");
    let text = fs::read_to_string(&args.path)?;
    let letters = engine.normalizer().normalize(&text).len();

    println!("File size: {}", fmt_count(text.len() as u64));
    println!("Letters:   {}", fmt_count(letters as u64));
    println!("Keyword:   {}\n", args.keyword);

    let request = build_request(&args);

    if args.plain {
        let started = Instant::now();
        let output = engine.find(&text, &request)?;
        let elapsed = started.elapsed();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&output).map_err(io::Error::from)?);
            return Ok(());
        }

        println!("=== Matches ===");
        for m in output.matches.iter().take(args.top) {
            println!("{}", m);
        }
        print_summary(elapsed, output.skips_scanned, output.matches.len(), None, output.truncated);
    } else {
        let started = Instant::now();
        let output = engine.analyze(&text, &request)?;
        let elapsed = started.elapsed();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&output).map_err(io::Error::from)?);
            return Ok(());
        }

        println!("=== Ranked ===");
        for report in output.reports.iter().take(args.top) {
            println!("{}", report);
        }
        print_summary(
            elapsed,
            output.skips_scanned,
            output.match_count,
            Some(output.reports.len()),
            output.truncated,
        );
    }

    Ok(())
}

fn build_request(args: &Args) -> SearchRequest {
    let sweep = SweepConfig {
        max_skip: args.max_skip,
        time_budget_ms: args.time_budget_ms,
        parallel: args.parallel,
        ..SweepConfig::default()
    }
    .with_max_matches(args.max_matches);

    let mut request = SearchRequest::new(args.keyword.clone()).with_sweep(sweep);
    match args.direction.as_str() {
        "forward" => request = request.with_direction(Direction::Forward),
        "backward" => request = request.with_direction(Direction::Backward),
        _ => {}
    }
    if let Some(skip) = args.skip {
        request = request.with_skip(skip);
    }
    if let Some(seed) = &args.seed {
        request = request.with_seed(seed.clone());
    }
    request
}

fn print_summary(
    elapsed: Duration,
    skips: usize,
    matches: usize,
    reports: Option<usize>,
    truncated: bool,
) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Elapsed     : {:.3} s", secs);
    println!("Skips       : {}", fmt_count(skips as u64));
    println!("Matches     : {}", fmt_count(matches as u64));
    if let Some(reports) = reports {
        println!("Reports     : {}", fmt_count(reports as u64));
    }
    if secs > 0.0 {
        println!("Skips/sec   : {}", fmt_count((skips as f64 / secs) as u64));
    }
    if truncated {
        println!("Truncated   : yes (budget reached)");
    }
    println!("--------------------------------\n");
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
