//! Sample aggregation: per-function statistics and call-graph edges.
//!
//! One [`ProfileAggregate`] owns everything derived from one capture. Each
//! sample's stack is walked leaf to root exactly once, incrementing self time
//! for the leaf frame, total time once per function per sample, and
//! caller/callee edge weights between adjacent distinct frames.

use crate::aggregator::resolver::{resolve_frame, LibraryIndex};
use crate::parser::schema::{table_index, ProfileData, Thread};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Statistics for a single function, keyed by its demangled name.
#[derive(Debug, Clone)]
pub struct FunctionStats {
    /// Demangled name; the aggregation identity key
    pub name: String,

    /// Samples where this function was the leaf frame
    pub self_samples: u64,

    /// Samples where this function appeared anywhere on the stack,
    /// counted once per sample
    pub total_samples: u64,

    /// Edge weights from functions observed calling this one
    pub callers: IndexMap<String, u64>,

    /// Edge weights to functions observed called by this one
    pub callees: IndexMap<String, u64>,

    /// Library recorded at first sight; later resolutions never update it
    pub library: String,
}

impl FunctionStats {
    fn new(name: String, library: String) -> Self {
        Self {
            name,
            self_samples: 0,
            total_samples: 0,
            callers: IndexMap::new(),
            callees: IndexMap::new(),
            library,
        }
    }

    /// Total edge weight arriving from tracked callers
    pub fn caller_samples(&self) -> u64 {
        self.callers.values().sum()
    }
}

/// Aggregated view of one profile capture.
///
/// Functions are kept in an insertion-ordered map so first-match lookups and
/// report ordering are reproducible across runs.
#[derive(Debug)]
pub struct ProfileAggregate {
    libs: LibraryIndex,

    /// Per-function statistics, keyed by demangled name, in first-seen order
    pub functions: IndexMap<String, FunctionStats>,

    /// Samples processed; samples with an absent stack are not counted
    pub total_samples: u64,
}

impl ProfileAggregate {
    /// Build an empty aggregate over the capture's library table.
    pub fn new(profile: &ProfileData) -> Self {
        Self {
            libs: LibraryIndex::new(&profile.libs),
            functions: IndexMap::new(),
            total_samples: 0,
        }
    }

    /// Build and ingest in one step.
    pub fn from_profile(profile: &ProfileData, thread_filter: Option<&str>) -> Self {
        let mut aggregate = Self::new(profile);
        aggregate.aggregate(profile, thread_filter);
        aggregate
    }

    /// Number of libraries in the capture
    pub fn library_count(&self) -> usize {
        self.libs.len()
    }

    /// Ingest every thread whose name contains `thread_filter` as a
    /// case-insensitive substring (all threads when absent).
    ///
    /// One-shot: calling this twice on the same aggregate double-counts.
    pub fn aggregate(&mut self, profile: &ProfileData, thread_filter: Option<&str>) {
        let needle = thread_filter.map(str::to_lowercase);

        for thread in &profile.threads {
            if let Some(needle) = &needle {
                if !thread.name.to_lowercase().contains(needle) {
                    continue;
                }
            }
            debug!(
                "Aggregating thread '{}': {} samples",
                thread.name,
                thread.samples.stack.len()
            );
            self.aggregate_thread(thread);
        }

        debug!(
            "Aggregated {} samples across {} functions",
            self.total_samples,
            self.functions.len()
        );
    }

    fn aggregate_thread(&mut self, thread: &Thread) {
        let stack_frames = &thread.stack_table.frame;
        let stack_prefixes = &thread.stack_table.prefix;

        for sample_stack in &thread.samples.stack {
            // Samples without a stack are skipped entirely
            let Some(stack_idx) = table_index(*sample_stack) else {
                continue;
            };

            self.total_samples += 1;

            let mut seen_in_stack: HashSet<String> = HashSet::new();
            let mut prev_name: Option<String> = None;
            let mut is_leaf = true;
            let mut cursor = Some(stack_idx);

            // Walk leaf to root via parent pointers; stop on an absent or
            // out-of-range parent
            while let Some(idx) = cursor {
                let Some(frame) = stack_frames.get(idx) else {
                    break;
                };
                let frame_idx = usize::try_from(*frame).unwrap_or(usize::MAX);
                let (name, library) = resolve_frame(&self.libs, thread, frame_idx);

                let stats = self
                    .functions
                    .entry(name.clone())
                    .or_insert_with(|| FunctionStats::new(name.clone(), library));

                // Self time goes to the leaf frame only, even under recursion
                if is_leaf {
                    stats.self_samples += 1;
                    is_leaf = false;
                }

                // Total time counts each function once per sample
                if seen_in_stack.insert(name.clone()) {
                    stats.total_samples += 1;
                }

                // prev_name is the more leaf-ward frame, so the current frame
                // is its caller. Recursive re-occurrences are not deduplicated
                // here; that quirk is part of the contract.
                if let Some(prev) = prev_name.as_deref() {
                    if prev != name {
                        *stats.callees.entry(prev.to_string()).or_insert(0) += 1;
                        if let Some(prev_stats) = self.functions.get_mut(prev) {
                            *prev_stats.callers.entry(name.clone()).or_insert(0) += 1;
                        }
                    }
                }

                prev_name = Some(name);
                cursor = table_index(stack_prefixes.get(idx).copied().flatten());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One thread, two samples: f2→f1→f0 and f1→f0 (leaf first).
    fn two_sample_profile() -> ProfileData {
        serde_json::from_value(serde_json::json!({
            "libs": [],
            "threads": [{
                "name": "main",
                "samples": {"stack": [2, 1]},
                // stack 0 = f0 (root), stack 1 = f1 (parent 0), stack 2 = f2 (parent 1)
                "stackTable": {"frame": [0, 1, 2], "prefix": [null, 0, 1]},
                "frameTable": {
                    "func": [0, 1, 2],
                    "nativeSymbol": [null, null, null],
                    "address": [null, null, null],
                },
                "funcTable": {"name": [0, 1, 2]},
                "nativeSymbols": {"name": [], "libIndex": []},
                "stringArray": ["f0", "f1", "f2"],
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_two_sample_scenario() {
        let profile = two_sample_profile();
        let agg = ProfileAggregate::from_profile(&profile, None);

        assert_eq!(agg.total_samples, 2);

        let f0 = &agg.functions["f0"];
        assert_eq!((f0.self_samples, f0.total_samples), (0, 2));
        let f1 = &agg.functions["f1"];
        assert_eq!((f1.self_samples, f1.total_samples), (1, 2));
        let f2 = &agg.functions["f2"];
        assert_eq!((f2.self_samples, f2.total_samples), (1, 1));

        assert_eq!(f0.callees["f1"], 2);
        assert_eq!(f1.callers["f0"], 2);
        assert_eq!(f1.callees["f2"], 1);
        assert_eq!(f2.callers["f1"], 1);
        assert!(f0.callers.is_empty());
        assert!(f2.callees.is_empty());
    }

    #[test]
    fn test_self_samples_sum_equals_total() {
        let profile = two_sample_profile();
        let agg = ProfileAggregate::from_profile(&profile, None);

        // Every sample had a non-empty stack, so leaf counts partition them
        let self_sum: u64 = agg.functions.values().map(|f| f.self_samples).sum();
        assert_eq!(self_sum, agg.total_samples);
        for func in agg.functions.values() {
            assert!(func.self_samples <= func.total_samples);
        }
    }

    #[test]
    fn test_absent_sample_stack_is_skipped() {
        let profile: ProfileData = serde_json::from_value(serde_json::json!({
            "threads": [{
                "name": "main",
                "samples": {"stack": [null, 0, null]},
                "stackTable": {"frame": [0], "prefix": [null]},
                "frameTable": {"func": [0], "nativeSymbol": [null], "address": [null]},
                "funcTable": {"name": [0]},
                "stringArray": ["only"],
            }]
        }))
        .unwrap();

        let agg = ProfileAggregate::from_profile(&profile, None);
        assert_eq!(agg.total_samples, 1);
        assert_eq!(agg.functions["only"].self_samples, 1);
    }

    #[test]
    fn test_out_of_range_stack_index_still_counts_sample() {
        let profile: ProfileData = serde_json::from_value(serde_json::json!({
            "threads": [{
                "name": "main",
                "samples": {"stack": [7]},
                "stackTable": {"frame": [0], "prefix": [null]},
                "frameTable": {"func": [0], "nativeSymbol": [null], "address": [null]},
                "funcTable": {"name": [0]},
                "stringArray": ["f"],
            }]
        }))
        .unwrap();

        let agg = ProfileAggregate::from_profile(&profile, None);
        // The sample is counted but resolves to zero frames
        assert_eq!(agg.total_samples, 1);
        assert!(agg.functions.is_empty());
    }

    #[test]
    fn test_thread_filter_substring_case_insensitive() {
        let mut profile = two_sample_profile();
        profile.threads[0].name = "RenderThread".to_string();

        let agg = ProfileAggregate::from_profile(&profile, Some("render"));
        assert_eq!(agg.total_samples, 2);

        let filtered = ProfileAggregate::from_profile(&profile, Some("io"));
        assert_eq!(filtered.total_samples, 0);
        assert!(filtered.functions.is_empty());
    }

    /// Recursive stack rec→rec→outer: total deduplicated, edges not.
    fn recursive_profile() -> ProfileData {
        serde_json::from_value(serde_json::json!({
            "threads": [{
                "name": "main",
                "samples": {"stack": [2]},
                "stackTable": {"frame": [0, 1, 1], "prefix": [null, 0, 1]},
                "frameTable": {
                    "func": [0, 1, 1],
                    "nativeSymbol": [null, null, null],
                    "address": [null, null, null],
                },
                "funcTable": {"name": [0, 1]},
                "stringArray": ["outer", "rec"],
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_recursion_total_counted_once() {
        let profile = recursive_profile();
        let agg = ProfileAggregate::from_profile(&profile, None);

        let rec = &agg.functions["rec"];
        assert_eq!(rec.self_samples, 1);
        // Appears twice on the stack but counts once
        assert_eq!(rec.total_samples, 1);
        let outer = &agg.functions["outer"];
        assert_eq!((outer.self_samples, outer.total_samples), (0, 1));
    }

    #[test]
    fn test_recursion_does_not_emit_self_edges() {
        let profile = recursive_profile();
        let agg = ProfileAggregate::from_profile(&profile, None);

        // Adjacent identical frames produce no edge; only rec→outer exists
        let rec = &agg.functions["rec"];
        assert!(rec.callees.is_empty());
        assert_eq!(rec.callers["outer"], 1);
        assert_eq!(agg.functions["outer"].callees["rec"], 1);
    }

    #[test]
    fn test_aggregate_twice_double_counts() {
        let profile = two_sample_profile();
        let mut agg = ProfileAggregate::new(&profile);
        agg.aggregate(&profile, None);
        agg.aggregate(&profile, None);

        assert_eq!(agg.total_samples, 4);
        assert_eq!(agg.functions["f1"].total_samples, 4);
    }

    #[test]
    fn test_library_recorded_at_first_sight() {
        // Same function name resolved from two frames with different
        // libraries keeps the first library
        let profile: ProfileData = serde_json::from_value(serde_json::json!({
            "libs": [
                {"name": "first", "start": 0, "end": 4096},
                {"name": "second", "start": 4096, "end": 8192},
            ],
            "threads": [{
                "name": "main",
                "samples": {"stack": [0, 1]},
                "stackTable": {"frame": [0, 1], "prefix": [null, null]},
                "frameTable": {
                    "func": [null, null],
                    "nativeSymbol": [0, 1],
                    "address": [null, null],
                },
                "nativeSymbols": {"name": [0, 0], "libIndex": [0, 1]},
                "stringArray": ["shared"],
            }]
        }))
        .unwrap();

        let agg = ProfileAggregate::from_profile(&profile, None);
        assert_eq!(agg.functions["shared"].library, "first");
        assert_eq!(agg.functions["shared"].total_samples, 2);
    }
}
