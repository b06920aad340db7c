//! Samprof CLI
//!
//! Analyzes samply/Firefox Profiler JSON captures to identify performance
//! bottlenecks: hot functions, library rollups, caller/callee relationships,
//! call trees, and before/after comparisons.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use samprof::commands::{execute_analyze, AnalyzeArgs};
use samprof::query::RankBy;

/// Samprof - performance analysis for samply/Firefox Profiler captures
#[derive(Parser, Debug)]
#[command(name = "samprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to profile.json
    profile: PathBuf,

    /// Number of top functions to show
    #[arg(short = 'n', long = "top", default_value = "20")]
    top: usize,

    /// Filter to functions in this library
    #[arg(short, long)]
    lib: Option<String>,

    /// Filter to threads whose name contains this string
    #[arg(short, long)]
    thread: Option<String>,

    /// Ranking metric for hot functions
    #[arg(long, value_enum, default_value = "self")]
    by: RankBy,

    /// Show callers of the function matching this name
    #[arg(short, long)]
    callers: Option<String>,

    /// Show callees of the function matching this name
    #[arg(long)]
    callees: Option<String>,

    /// Show the call tree
    #[arg(long)]
    tree: bool,

    /// Maximum call tree depth
    #[arg(long, default_value = "5")]
    tree_depth: usize,

    /// Minimum percentage for tree expansion
    #[arg(long, default_value = "1.0")]
    min_pct: f64,

    /// Output the structured result as JSON
    #[arg(short, long)]
    json: bool,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compare against another profile
    #[arg(short, long)]
    diff: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute analysis
    let args = AnalyzeArgs {
        profile: cli.profile,
        diff: cli.diff,
        thread: cli.thread,
        lib: cli.lib,
        by: cli.by,
        top: cli.top,
        callers: cli.callers,
        callees: cli.callees,
        tree: cli.tree,
        tree_depth: cli.tree_depth,
        min_pct: cli.min_pct,
        json: cli.json,
        output: cli.output,
    };

    execute_analyze(args)
}
