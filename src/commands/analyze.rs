//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the profile capture from disk
//! 2. Aggregates sample stacks into function statistics
//! 3. Dispatches to the requested view (summary, callers/callees, tree,
//!    JSON export, or diff against a second capture)

use crate::aggregator::ProfileAggregate;
use crate::diff::compare;
use crate::output::{
    render_diff, render_edges, render_export, render_summary, render_tree, write_export,
    AnalysisExport,
};
use crate::parser::load_profile;
use crate::query::{build_call_tree, callees_of, callers_of, RankBy};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the profile capture
    pub profile: PathBuf,

    /// Optional second capture to diff against
    pub diff: Option<PathBuf>,

    /// Thread-name substring filter
    pub thread: Option<String>,

    /// Library-name substring filter for the summary
    pub lib: Option<String>,

    /// Ranking metric for hot functions
    pub by: RankBy,

    /// Result count for rankings and diff tables
    pub top: usize,

    /// Show callers of the function matching this name
    pub callers: Option<String>,

    /// Show callees of the function matching this name
    pub callees: Option<String>,

    /// Show the call tree instead of the summary
    pub tree: bool,

    /// Maximum call-tree depth
    pub tree_depth: usize,

    /// Minimum percentage threshold for the call tree
    pub min_pct: f64,

    /// Emit the structured JSON result
    pub json: bool,

    /// Write the JSON result to this path instead of stdout
    pub output: Option<PathBuf>,
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Profile file missing or unreadable
/// * JSON export write failures
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let aggregate = load_and_aggregate(&args.profile, args.thread.as_deref())?;

    // Diff mode: aggregate the second capture independently and compare
    if let Some(diff_path) = &args.diff {
        let after = load_and_aggregate(diff_path, args.thread.as_deref())?;
        let report = compare(&aggregate, &after, args.top);
        print!("{}", render_diff(&report));
        return Ok(());
    }

    if args.json {
        let export = AnalysisExport::from_aggregate(&aggregate);
        match &args.output {
            Some(path) => write_export(&export, path)
                .with_context(|| format!("failed to write analysis to {}", path.display()))?,
            None => println!("{}", render_export(&export)?),
        }
        return Ok(());
    }

    if let Some(pattern) = &args.callers {
        match callers_of(&aggregate, pattern, args.top) {
            Some(edges) => print!("{}", render_edges("CALLERS", &edges, aggregate.total_samples)),
            None => println!("No function matching '{pattern}' found."),
        }
        return Ok(());
    }

    if let Some(pattern) = &args.callees {
        match callees_of(&aggregate, pattern, args.top) {
            Some(edges) => print!("{}", render_edges("CALLEES", &edges, aggregate.total_samples)),
            None => println!("No function matching '{pattern}' found."),
        }
        return Ok(());
    }

    if args.tree {
        let roots = build_call_tree(&aggregate, args.tree_depth, args.min_pct);
        print!("{}", render_tree(&roots, args.tree_depth, args.min_pct));
        return Ok(());
    }

    print!(
        "{}",
        render_summary(&aggregate, args.by, args.top, args.lib.as_deref())
    );
    Ok(())
}

fn load_and_aggregate(path: &PathBuf, thread_filter: Option<&str>) -> Result<ProfileAggregate> {
    let data = load_profile(path)
        .with_context(|| format!("failed to load profile {}", path.display()))?;

    let mut aggregate = ProfileAggregate::new(&data);
    aggregate.aggregate(&data, thread_filter);

    info!(
        "Aggregated {}: {} samples, {} functions",
        path.display(),
        aggregate.total_samples,
        aggregate.functions.len()
    );

    Ok(aggregate)
}
