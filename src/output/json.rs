//! Structured JSON export of an aggregated capture.
//!
//! This is the machine-readable result consumed by automation: total sample
//! count, the per-library rollup, and the top functions ranked by self time.

use crate::aggregator::ProfileAggregate;
use crate::query::{hot_functions, library_breakdown, percentage, LibraryStats, RankBy};
use crate::utils::config::{JSON_EXPORT_FUNCTIONS, SCHEMA_VERSION};
use crate::utils::error::OutputError;
use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level analysis result written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisExport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Samples processed during aggregation
    pub total_samples: u64,

    /// Per-library rollup, descending by self time
    pub libraries: IndexMap<String, LibraryStats>,

    /// Top functions by self time
    pub functions: Vec<FunctionEntry>,

    /// Timestamp when the export was generated
    pub generated_at: String,
}

/// One ranked function in the export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub library: String,
    pub self_samples: u64,
    pub total_samples: u64,

    /// Percentage of total samples, rounded to 2 decimal places
    pub self_pct: f64,
    pub total_pct: f64,
}

impl AnalysisExport {
    /// Build the export from an aggregated capture.
    pub fn from_aggregate(aggregate: &ProfileAggregate) -> Self {
        let functions = hot_functions(
            aggregate,
            RankBy::SelfTime,
            JSON_EXPORT_FUNCTIONS,
            None,
            0.0,
        )
        .into_iter()
        .map(|func| FunctionEntry {
            name: func.name.clone(),
            library: func.library.clone(),
            self_samples: func.self_samples,
            total_samples: func.total_samples,
            self_pct: round2(percentage(func.self_samples, aggregate.total_samples)),
            total_pct: round2(percentage(func.total_samples, aggregate.total_samples)),
        })
        .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            total_samples: aggregate.total_samples,
            libraries: library_breakdown(aggregate),
            functions,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serialize an export to pretty-printed JSON
pub fn render_export(export: &AnalysisExport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(export).map_err(OutputError::SerializationFailed)
}

/// Write an export to a JSON file, creating parent directories as needed
pub fn write_export(
    export: &AnalysisExport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing analysis to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, export).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::ProfileData;

    fn aggregate() -> ProfileAggregate {
        let profile: ProfileData = serde_json::from_value(serde_json::json!({
            "libs": [{"name": "app", "start": 0}],
            "threads": [{
                "name": "main",
                "samples": {"stack": [1, 1, 0]},
                "stackTable": {"frame": [0, 1], "prefix": [null, 0]},
                "frameTable": {
                    "func": [0, 1],
                    "nativeSymbol": [null, null],
                    "address": [null, null],
                },
                "funcTable": {"name": [0, 1]},
                "stringArray": ["outer", "inner"],
            }]
        }))
        .unwrap();
        ProfileAggregate::from_profile(&profile, None)
    }

    #[test]
    fn test_export_shape() {
        let export = AnalysisExport::from_aggregate(&aggregate());

        assert_eq!(export.version, SCHEMA_VERSION);
        assert_eq!(export.total_samples, 3);
        assert_eq!(export.functions.len(), 2);

        // Ranked by self time: inner leads with 2 of 3 samples
        let top = &export.functions[0];
        assert_eq!(top.name, "inner");
        assert_eq!(top.self_pct, 66.67);
        assert_eq!(top.total_pct, 66.67);
        assert_eq!(export.functions[1].self_pct, 33.33);
    }

    #[test]
    fn test_export_round_trips_through_json() {
        let export = AnalysisExport::from_aggregate(&aggregate());
        let json = render_export(&export).unwrap();
        let parsed: AnalysisExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_samples, export.total_samples);
        assert_eq!(parsed.functions.len(), export.functions.len());
        // Library rollup keys keep their order
        assert_eq!(
            parsed.libraries.keys().collect::<Vec<_>>(),
            export.libraries.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/analysis.json");

        let export = AnalysisExport::from_aggregate(&aggregate());
        write_export(&export, &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_validate_output_path_rejects_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export = AnalysisExport::from_aggregate(&aggregate());
        assert!(write_export(&export, temp_dir.path()).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(33.333_333), 33.33);
    }
}
