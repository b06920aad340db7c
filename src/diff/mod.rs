//! Before/after comparison of two aggregated captures.
//!
//! The two aggregates are fully independent; comparison only reads them.

pub mod engine;

pub use engine::{compare, DiffEntry, DiffReport};
