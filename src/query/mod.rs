//! Read-only views over an aggregated capture.
//!
//! Hot-function ranking, per-library rollups, and caller/callee lookup.
//! Nothing in here mutates the aggregate.

pub mod tree;

pub use tree::{build_call_tree, CallTreeNode};

use crate::aggregator::{FunctionStats, ProfileAggregate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ranking metric for hot-function queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RankBy {
    /// Samples where the function was the leaf frame
    #[default]
    #[value(name = "self")]
    SelfTime,

    /// Samples where the function appeared anywhere on the stack
    #[value(name = "total")]
    TotalTime,
}

impl RankBy {
    pub fn samples(&self, func: &FunctionStats) -> u64 {
        match self {
            RankBy::SelfTime => func.self_samples,
            RankBy::TotalTime => func.total_samples,
        }
    }
}

/// Percentage of total samples, zero when the trace is empty
pub fn percentage(samples: u64, total_samples: u64) -> f64 {
    if total_samples > 0 {
        samples as f64 / total_samples as f64 * 100.0
    } else {
        0.0
    }
}

/// Rank functions by the chosen metric, descending.
///
/// `lib_filter` is a case-insensitive substring match on the library name;
/// `min_pct` drops functions below that share of total samples (measured on
/// the ranking metric). Ties keep first-seen order.
pub fn hot_functions<'a>(
    aggregate: &'a ProfileAggregate,
    by: RankBy,
    top_n: usize,
    lib_filter: Option<&str>,
    min_pct: f64,
) -> Vec<&'a FunctionStats> {
    let mut funcs: Vec<&FunctionStats> = aggregate.functions.values().collect();

    if let Some(filter) = lib_filter {
        let needle = filter.to_lowercase();
        funcs.retain(|f| f.library.to_lowercase().contains(&needle));
    }

    if min_pct > 0.0 && aggregate.total_samples > 0 {
        let threshold = aggregate.total_samples as f64 * (min_pct / 100.0);
        funcs.retain(|f| by.samples(f) as f64 >= threshold);
    }

    funcs.sort_by(|a, b| by.samples(b).cmp(&by.samples(a)));
    funcs.truncate(top_n);
    funcs
}

/// Per-library rollup of function statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryStats {
    #[serde(rename = "self")]
    pub self_samples: u64,

    #[serde(rename = "total")]
    pub total_samples: u64,

    pub functions: u64,
}

/// Sum function statistics per library, descending by self time.
///
/// Every function belongs to exactly one library (the one recorded at its
/// creation), so no sample is double-counted across libraries.
pub fn library_breakdown(aggregate: &ProfileAggregate) -> IndexMap<String, LibraryStats> {
    let mut libs: IndexMap<String, LibraryStats> = IndexMap::new();

    for func in aggregate.functions.values() {
        let entry = libs.entry(func.library.clone()).or_default();
        entry.self_samples += func.self_samples;
        entry.total_samples += func.total_samples;
        entry.functions += 1;
    }

    libs.sort_by(|_, a, _, b| b.self_samples.cmp(&a.self_samples));
    libs
}

/// Edge listing for one matched function
#[derive(Debug, Clone)]
pub struct CallEdges<'a> {
    /// Full name of the matched function
    pub function: &'a str,

    /// (neighbor name, edge weight), descending by weight
    pub edges: Vec<(&'a str, u64)>,
}

/// Top callers of the first function whose name contains `pattern`
/// (case-insensitive, first-seen order). `None` when nothing matches.
pub fn callers_of<'a>(
    aggregate: &'a ProfileAggregate,
    pattern: &str,
    top_n: usize,
) -> Option<CallEdges<'a>> {
    let stats = find_function(aggregate, pattern)?;
    Some(CallEdges {
        function: &stats.name,
        edges: top_edges(&stats.callers, top_n),
    })
}

/// Top callees of the first function whose name contains `pattern`.
pub fn callees_of<'a>(
    aggregate: &'a ProfileAggregate,
    pattern: &str,
    top_n: usize,
) -> Option<CallEdges<'a>> {
    let stats = find_function(aggregate, pattern)?;
    Some(CallEdges {
        function: &stats.name,
        edges: top_edges(&stats.callees, top_n),
    })
}

fn find_function<'a>(aggregate: &'a ProfileAggregate, pattern: &str) -> Option<&'a FunctionStats> {
    let needle = pattern.to_lowercase();
    aggregate
        .functions
        .values()
        .find(|f| f.name.to_lowercase().contains(&needle))
}

fn top_edges(edges: &IndexMap<String, u64>, top_n: usize) -> Vec<(&str, u64)> {
    let mut out: Vec<(&str, u64)> = edges.iter().map(|(n, c)| (n.as_str(), *c)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out.truncate(top_n);
    out
}
