//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Demangled names longer than this get their generic parameters collapsed
pub const MAX_DEMANGLED_LEN: usize = 120;

/// Default display width for function names in reports
pub const DISPLAY_NAME_LEN: usize = 80;

/// Number of ranked functions included in the JSON export
pub const JSON_EXPORT_FUNCTIONS: usize = 100;

/// A function whose tracked callers explain less than this fraction of its
/// total samples is treated as a call-tree root
pub const ROOT_CALLER_RATIO: f64 = 0.5;

/// Call-tree rendering caps: roots expanded, children per node
pub const TREE_MAX_ROOTS: usize = 5;
pub const TREE_MAX_CHILDREN: usize = 3;

/// Diff entries below this self-time delta (percentage points) are dropped
pub const DIFF_MIN_DELTA: f64 = 0.1;

/// Delta magnitude counted as an improvement/regression in the diff summary
pub const DIFF_SIGNIFICANT_DELTA: f64 = 0.5;
