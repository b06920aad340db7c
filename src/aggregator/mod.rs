//! Aggregation of sample stacks into per-function statistics.
//!
//! This module transforms a loaded capture into:
//! - Per-function self/total sample counts
//! - Caller/callee call-graph edge weights
//! - A library index for frame resolution

pub mod resolver;
pub mod stats;

// Re-export main types and functions
pub use resolver::{resolve_frame, LibraryIndex};
pub use stats::{FunctionStats, ProfileAggregate};
