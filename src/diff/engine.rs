//! Core diff implementation: self-time percentage deltas between two
//! independently aggregated captures.

use crate::aggregator::ProfileAggregate;
use crate::utils::config::{DIFF_MIN_DELTA, DIFF_SIGNIFICANT_DELTA};
use indexmap::IndexSet;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One function's self-time change between the two captures
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    pub name: String,
    pub before_pct: f64,
    pub after_pct: f64,
    pub delta: f64,
}

/// Comparison of two captures, normalized by each capture's sample count
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub before_samples: u64,
    pub after_samples: u64,

    /// Biggest movers by |delta|, truncated to the requested count
    pub entries: Vec<DiffEntry>,

    /// Functions with delta at or below -0.5 percentage points,
    /// counted before truncation
    pub improved: usize,

    /// Functions with delta at or above +0.5 percentage points,
    /// counted before truncation
    pub regressed: usize,
}

/// Compare two aggregates by normalized self-time percentage.
///
/// Deltas below 0.1 percentage points in magnitude are dropped; the rest are
/// sorted descending by |delta| with first-seen order breaking ties. Each
/// side's denominator is floored at one sample so empty captures diff to
/// all-zero percentages instead of dividing by zero.
pub fn compare(before: &ProfileAggregate, after: &ProfileAggregate, top_n: usize) -> DiffReport {
    let before_pct = self_percentages(before);
    let after_pct = self_percentages(after);

    // Union of names, insertion-ordered for reproducible tie-breaking
    let mut names: IndexSet<&str> = before.functions.keys().map(String::as_str).collect();
    names.extend(after.functions.keys().map(String::as_str));

    let mut entries: Vec<DiffEntry> = Vec::new();
    for name in names {
        let b = before_pct.get(name).copied().unwrap_or(0.0);
        let a = after_pct.get(name).copied().unwrap_or(0.0);
        let delta = a - b;
        if delta.abs() >= DIFF_MIN_DELTA {
            entries.push(DiffEntry {
                name: name.to_string(),
                before_pct: b,
                after_pct: a,
                delta,
            });
        }
    }

    entries.sort_by(|x, y| {
        y.delta
            .abs()
            .partial_cmp(&x.delta.abs())
            .unwrap_or(Ordering::Equal)
    });

    let improved = entries
        .iter()
        .filter(|e| e.delta <= -DIFF_SIGNIFICANT_DELTA)
        .count();
    let regressed = entries
        .iter()
        .filter(|e| e.delta >= DIFF_SIGNIFICANT_DELTA)
        .count();

    entries.truncate(top_n);

    DiffReport {
        before_samples: before.total_samples,
        after_samples: after.total_samples,
        entries,
        improved,
        regressed,
    }
}

fn self_percentages(aggregate: &ProfileAggregate) -> HashMap<&str, f64> {
    let total = aggregate.total_samples.max(1) as f64;
    aggregate
        .functions
        .iter()
        .map(|(name, func)| (name.as_str(), func.self_samples as f64 / total * 100.0))
        .collect()
}
