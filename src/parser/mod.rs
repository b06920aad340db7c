//! Trace loading and schema definitions.
//!
//! This module handles:
//! - Deserializing samply/Firefox Profiler JSON captures
//! - Degrading partially-shaped captures to empty tables

pub mod profile;
pub mod schema;

// Re-export main types
pub use profile::load_profile;
pub use schema::{LibraryInfo, ProfileData, Thread};
