//! Samprof
//!
//! Performance analysis for samply/Firefox Profiler JSON captures:
//! per-function self/total sample counts, caller/callee call-graph edges,
//! per-library rollups, a simplified call tree, and before/after diffs.
//!
//! This crate provides the core implementation for the `samprof` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install samprof
//! samprof profile.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod demangle;
pub mod diff;
pub mod output;
pub mod parser;
pub mod query;
pub mod utils;
