//! Result rendering: structured JSON export and terminal report tables.

pub mod json;
pub mod report;

// Re-export main types and functions
pub use json::{render_export, write_export, AnalysisExport, FunctionEntry};
pub use report::{render_diff, render_edges, render_summary, render_tree};
