//! Terminal report rendering.
//!
//! Human-readable tables for the summary, caller/callee listings, the call
//! tree, and profile comparisons. Display names are truncated here; the
//! aggregation identity never is.

use crate::aggregator::ProfileAggregate;
use crate::demangle::shorten;
use crate::diff::DiffReport;
use crate::query::{
    hot_functions, library_breakdown, percentage, CallEdges, CallTreeNode, RankBy,
};
use crate::utils::config::DISPLAY_NAME_LEN;

const RULE_WIDTH: usize = 70;

fn heading(title: &str) -> String {
    format!("\n{}\n{}\n{}\n", "=".repeat(RULE_WIDTH), title, "=".repeat(RULE_WIDTH))
}

/// Render the default summary: totals, library breakdown, hot functions.
pub fn render_summary(
    aggregate: &ProfileAggregate,
    by: RankBy,
    top_n: usize,
    lib_filter: Option<&str>,
) -> String {
    let mut out = String::new();
    let total = aggregate.total_samples;

    out.push_str(&heading("PROFILE SUMMARY"));
    out.push_str(&format!("Total samples: {total}\n"));
    out.push_str(&format!("Unique functions: {}\n", aggregate.functions.len()));
    out.push_str(&format!("Libraries: {}\n", aggregate.library_count()));

    out.push_str(&heading("LIBRARY BREAKDOWN (by self time)"));
    out.push_str(&format!(
        "{:<40} {:>10} {:>10} {:>8}\n",
        "Library", "Self %", "Total %", "Funcs"
    ));
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));

    for (lib, stats) in library_breakdown(aggregate).iter().take(10) {
        out.push_str(&format!(
            "{:<40} {:>9.1}% {:>9.1}% {:>8}\n",
            shorten(lib, 40),
            percentage(stats.self_samples, total),
            percentage(stats.total_samples, total),
            stats.functions
        ));
    }

    let metric = match by {
        RankBy::SelfTime => "self time",
        RankBy::TotalTime => "total time",
    };
    let filter_note = lib_filter
        .map(|f| format!(" - filtered: {f}"))
        .unwrap_or_default();
    out.push_str(&heading(&format!("HOT FUNCTIONS (by {metric}){filter_note}")));
    out.push_str(&format!(
        "{:>8} {:>7} {:>7}  {}\n",
        "Samples", "Self%", "Total%", "Function"
    ));
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));

    for func in hot_functions(aggregate, by, top_n, lib_filter, 0.0) {
        out.push_str(&format!(
            "{:>8} {:>6.1}% {:>6.1}%  {}\n",
            by.samples(func),
            percentage(func.self_samples, total),
            percentage(func.total_samples, total),
            shorten(&func.name, DISPLAY_NAME_LEN)
        ));
    }

    out
}

/// Render an edge listing produced by a caller or callee query.
pub fn render_edges(kind: &str, edges: &CallEdges<'_>, total_samples: u64) -> String {
    let mut out = String::new();

    out.push_str(&heading(&format!("{kind} OF: {}", edges.function)));
    for (name, count) in &edges.edges {
        out.push_str(&format!(
            "{:>8} ({:>5.1}%)  {}\n",
            count,
            percentage(*count, total_samples),
            shorten(name, DISPLAY_NAME_LEN)
        ));
    }

    out
}

/// Render the reconstructed call tree.
pub fn render_tree(roots: &[CallTreeNode], max_depth: usize, min_pct: f64) -> String {
    let mut out = String::new();

    out.push_str(&heading(&format!(
        "CALL TREE (min {min_pct}% of samples, depth {max_depth})"
    )));

    for root in roots {
        render_tree_node(&mut out, root, 0, "");
        out.push('\n');
    }

    out
}

fn render_tree_node(out: &mut String, node: &CallTreeNode, depth: usize, prefix: &str) {
    let marker = if depth > 0 { "└── " } else { "" };
    out.push_str(&format!(
        "{prefix}{marker}{:>5.1}% ({:>4.1}% self) {}\n",
        node.total_pct,
        node.self_pct,
        shorten(&node.name, 50)
    ));

    let child_prefix = if depth > 0 {
        format!("{prefix}    ")
    } else {
        prefix.to_string()
    };
    for child in &node.children {
        render_tree_node(out, child, depth + 1, &child_prefix);
    }
}

/// Render a before/after comparison table.
pub fn render_diff(report: &DiffReport) -> String {
    let mut out = String::new();

    out.push_str(&heading("PROFILE COMPARISON"));
    out.push_str(&format!("Before: {} samples\n", report.before_samples));
    out.push_str(&format!("After:  {} samples\n", report.after_samples));

    out.push_str(&heading("BIGGEST CHANGES (by self time %)"));
    out.push_str(&format!(
        "{:>8} {:>8} {:>8}  {}\n",
        "Before%", "After%", "Diff", "Function"
    ));
    out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));

    for entry in &report.entries {
        out.push_str(&format!(
            "{:>7.1}% {:>7.1}% {:>+7.1}%  {}\n",
            entry.before_pct,
            entry.after_pct,
            entry.delta,
            shorten(&entry.name, 50)
        ));
    }

    out.push_str(&format!(
        "\nSummary: {} functions improved, {} regressed (>0.5% change)\n",
        report.improved, report.regressed
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEntry;
    use crate::parser::schema::ProfileData;
    use crate::query::{build_call_tree, callees_of};

    fn aggregate() -> ProfileAggregate {
        let profile: ProfileData = serde_json::from_value(serde_json::json!({
            "libs": [{"name": "app", "start": 0}],
            "threads": [{
                "name": "main",
                "samples": {"stack": [1, 1, 1, 0]},
                "stackTable": {"frame": [0, 1], "prefix": [null, 0]},
                "frameTable": {
                    "func": [0, 1],
                    "nativeSymbol": [null, null],
                    "address": [null, null],
                },
                "funcTable": {"name": [0, 1]},
                "stringArray": ["main", "work"],
            }]
        }))
        .unwrap();
        ProfileAggregate::from_profile(&profile, None)
    }

    #[test]
    fn test_summary_contains_totals_and_rankings() {
        let agg = aggregate();
        let text = render_summary(&agg, RankBy::SelfTime, 20, None);

        assert!(text.contains("Total samples: 4"));
        assert!(text.contains("Unique functions: 2"));
        assert!(text.contains("HOT FUNCTIONS (by self time)"));
        assert!(text.contains("work"));
    }

    #[test]
    fn test_summary_notes_library_filter() {
        let agg = aggregate();
        let text = render_summary(&agg, RankBy::TotalTime, 20, Some("app"));
        assert!(text.contains("HOT FUNCTIONS (by total time) - filtered: app"));
    }

    #[test]
    fn test_edge_listing() {
        let agg = aggregate();
        let edges = callees_of(&agg, "main", 10).unwrap();
        let text = render_edges("CALLEES", &edges, agg.total_samples);

        assert!(text.contains("CALLEES OF: main"));
        assert!(text.contains("work"));
    }

    #[test]
    fn test_tree_depth_markers() {
        let agg = aggregate();
        let roots = build_call_tree(&agg, 5, 1.0);
        let text = render_tree(&roots, 5, 1.0);

        assert!(text.contains("CALL TREE (min 1% of samples, depth 5)"));
        assert!(text.contains("main"));
        assert!(text.contains("└── "));
    }

    #[test]
    fn test_diff_table_signs() {
        let report = DiffReport {
            before_samples: 10,
            after_samples: 10,
            entries: vec![
                DiffEntry {
                    name: "worse".into(),
                    before_pct: 10.0,
                    after_pct: 20.0,
                    delta: 10.0,
                },
                DiffEntry {
                    name: "better".into(),
                    before_pct: 20.0,
                    after_pct: 10.0,
                    delta: -10.0,
                },
            ],
            improved: 1,
            regressed: 1,
        };
        let text = render_diff(&report);

        assert!(text.contains("+10.0%"));
        assert!(text.contains("-10.0%"));
        assert!(text.contains("Summary: 1 functions improved, 1 regressed"));
    }
}
