//! Read/write the split audit artifact.
//!
//! The artifact is the durable record that a given split was leak-free:
//! - field names and split configuration (fractions + seed)
//! - per-partition row counts and target rates
//! - the disjointness report
//!
//! Downstream regression checks depend on these fields; bump
//! `SPLIT_ARTIFACT_SCHEMA_VERSION` when changing the layout.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::leakage::DisjointnessReport;
use crate::report::SplitSummary;
use crate::split::{SplitConfiguration, SplitFractions};

pub const SPLIT_ARTIFACT_SCHEMA_VERSION: &str = "1.0.0";
pub const SPLIT_ARTIFACT_FILENAME: &str = "split_config.json";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowCounts {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRates {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
    pub overall: f64,
}

/// Persisted description of one split run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitArtifact {
    pub schema_version: String,
    pub created_utc: DateTime<Utc>,
    pub group_field: String,
    pub target_field: String,
    pub random_seed: u64,
    pub fractions: SplitFractions,
    pub row_counts: RowCounts,
    pub target_rates: TargetRates,
    pub disjointness: DisjointnessReport,
}

impl SplitArtifact {
    /// Assemble an artifact stamped with the current UTC time.
    pub fn new(
        group_field: &str,
        target_field: &str,
        config: &SplitConfiguration,
        summary: &SplitSummary,
        disjointness: DisjointnessReport,
    ) -> Self {
        Self {
            schema_version: SPLIT_ARTIFACT_SCHEMA_VERSION.to_string(),
            created_utc: Utc::now(),
            group_field: group_field.to_string(),
            target_field: target_field.to_string(),
            random_seed: config.random_seed(),
            fractions: config.fractions(),
            row_counts: RowCounts {
                train: summary.train.rows,
                validation: summary.validation.rows,
                test: summary.test.rows,
                total: summary.total_rows,
            },
            target_rates: TargetRates {
                train: summary.train.target_rate,
                validation: summary.validation.target_rate,
                test: summary.test.target_rate,
                overall: summary.overall_target_rate,
            },
            disjointness,
        }
    }

    /// Rebuild the configuration the artifact was produced with.
    pub fn configuration(&self) -> Result<SplitConfiguration, AppError> {
        Ok(SplitConfiguration::from_fractions(self.fractions, self.random_seed)?)
    }
}

/// Write a split artifact as pretty JSON.
pub fn write_split_artifact(path: &Path, artifact: &SplitArtifact) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(
                AppError::EXIT_INTERNAL,
                format!("Failed to create artifact dir '{}': {e}", parent.display()),
            )
        })?;
    }

    let file = File::create(path).map_err(|e| {
        AppError::new(
            AppError::EXIT_INTERNAL,
            format!("Failed to create split artifact '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, artifact).map_err(|e| {
        AppError::new(AppError::EXIT_INTERNAL, format!("Failed to write split artifact: {e}"))
    })?;

    Ok(())
}

/// Read a split artifact.
pub fn read_split_artifact(path: &Path) -> Result<SplitArtifact, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            AppError::EXIT_CONFIG,
            format!("Failed to open split artifact '{}': {e}", path.display()),
        )
    })?;
    let artifact: SplitArtifact = serde_json::from_reader(file)
        .map_err(|e| AppError::new(AppError::EXIT_CONFIG, format!("Invalid split artifact: {e}")))?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PartitionStats;

    fn summary() -> SplitSummary {
        let stats = |rows, groups, target_rate| PartitionStats {
            rows,
            groups,
            positives: 0,
            target_rate,
        };
        SplitSummary {
            train: stats(70, 20, 0.1),
            validation: stats(15, 5, 0.2),
            test: stats(15, 5, 0.0),
            total_rows: 100,
            overall_target_rate: 0.1,
        }
    }

    #[test]
    fn artifact_carries_required_fields() {
        let artifact = SplitArtifact::new(
            "PATIENT_NBR",
            "READMITTED_30D",
            &SplitConfiguration::default(),
            &summary(),
            DisjointnessReport::default(),
        );
        let json = serde_json::to_value(&artifact).unwrap();

        for key in [
            "schema_version",
            "created_utc",
            "group_field",
            "target_field",
            "random_seed",
            "fractions",
            "row_counts",
            "target_rates",
            "disjointness",
        ] {
            assert!(json.get(key).is_some(), "missing `{key}`");
        }
        assert_eq!(json["schema_version"], SPLIT_ARTIFACT_SCHEMA_VERSION);
        assert_eq!(json["random_seed"], 42);
        assert_eq!(json["row_counts"]["total"], 100);
        assert_eq!(json["disjointness"]["overlap_train_test"], 0);
    }

    #[test]
    fn written_artifact_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SPLIT_ARTIFACT_FILENAME);
        let artifact = SplitArtifact::new(
            "PATIENT_NBR",
            "READMITTED_30D",
            &SplitConfiguration::new(0.8, 0.1, 0.1, 7).unwrap(),
            &summary(),
            DisjointnessReport::default(),
        );

        write_split_artifact(&path, &artifact).unwrap();
        let loaded = read_split_artifact(&path).unwrap();
        assert_eq!(loaded, artifact);
        assert_eq!(loaded.configuration().unwrap().random_seed(), 7);
    }
}
