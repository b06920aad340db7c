//! Heuristic call-tree reconstruction from aggregate edge weights.
//!
//! The aggregate only stores per-edge weights, not execution order, so this
//! is a reconstruction, not a faithful top-down tree. A function counts as a
//! root when its tracked callers explain less than half of its total samples;
//! that cutoff is load-bearing for downstream comparisons and must not be
//! re-derived.

use crate::aggregator::{FunctionStats, ProfileAggregate};
use crate::query::percentage;
use crate::utils::config::{ROOT_CALLER_RATIO, TREE_MAX_CHILDREN, TREE_MAX_ROOTS};
use serde::Serialize;

/// One node of the reconstructed call tree
#[derive(Debug, Clone, Serialize)]
pub struct CallTreeNode {
    pub name: String,
    pub total_pct: f64,
    pub self_pct: f64,
    pub children: Vec<CallTreeNode>,
}

/// Build the call tree for functions above `min_pct` of total samples.
///
/// Roots are sorted descending by total time, at most five expanded. Each
/// node expands its three heaviest callee edges whose target also clears the
/// threshold, down to `max_depth`.
pub fn build_call_tree(
    aggregate: &ProfileAggregate,
    max_depth: usize,
    min_pct: f64,
) -> Vec<CallTreeNode> {
    let threshold = aggregate.total_samples as f64 * (min_pct / 100.0);

    let mut roots: Vec<&FunctionStats> = aggregate
        .functions
        .values()
        .filter(|f| f.total_samples as f64 >= threshold)
        .filter(|f| (f.caller_samples() as f64) < f.total_samples as f64 * ROOT_CALLER_RATIO)
        .collect();
    roots.sort_by(|a, b| b.total_samples.cmp(&a.total_samples));

    roots
        .into_iter()
        .take(TREE_MAX_ROOTS)
        .map(|root| expand(aggregate, root, 0, max_depth, threshold))
        .collect()
}

fn expand(
    aggregate: &ProfileAggregate,
    func: &FunctionStats,
    depth: usize,
    max_depth: usize,
    threshold: f64,
) -> CallTreeNode {
    let mut node = CallTreeNode {
        name: func.name.clone(),
        total_pct: percentage(func.total_samples, aggregate.total_samples),
        self_pct: percentage(func.self_samples, aggregate.total_samples),
        children: Vec::new(),
    };

    if depth >= max_depth {
        return node;
    }

    let mut edges: Vec<(&String, u64)> = func.callees.iter().map(|(n, c)| (n, *c)).collect();
    edges.sort_by(|a, b| b.1.cmp(&a.1));

    for (callee, _weight) in edges.into_iter().take(TREE_MAX_CHILDREN) {
        if let Some(child) = aggregate.functions.get(callee) {
            if child.total_samples as f64 >= threshold {
                node.children
                    .push(expand(aggregate, child, depth + 1, max_depth, threshold));
            }
        }
    }

    node
}
