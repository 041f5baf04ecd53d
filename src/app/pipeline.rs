//! Shared split pipeline used by the CLI and the integration tests.
//!
//! ingest -> (optional) contract validation -> guarded split -> summary -> artifact
//!
//! Writing files is left to the caller so the pipeline can be run in tests
//! without touching disk beyond the input.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::{DataContract, ValidationOutcome, readmission_contract, validate_dataset};
use crate::domain::{Dataset, SplitLabel};
use crate::error::AppError;
use crate::io::{IngestedTable, SplitArtifact, load_dataset, write_dataset_csv};
use crate::leakage::{GuardedSplit, guarded_split};
use crate::report::{SplitSummary, summarize_split};
use crate::settings::Settings;
use crate::split::{SplitConfiguration, SplitResult};

/// All computed outputs of a single `readmit split` run.
#[derive(Debug, Clone)]
pub struct SplitRun {
    pub ingest: IngestedTable,
    /// Present when the run was strict.
    pub validation: Option<ValidationOutcome>,
    pub split: GuardedSplit,
    pub summary: SplitSummary,
    pub artifact: SplitArtifact,
}

/// The readmission contract with its key fields renamed to the configured ones.
pub fn contract_for(settings: &Settings) -> DataContract {
    let mut contract = readmission_contract();
    for (slot, field) in [
        (&mut contract.primary_key, &settings.record_field),
        (&mut contract.patient_key, &settings.group_field),
        (&mut contract.target, &settings.target_field),
    ] {
        if slot != field {
            if let Some(rule) = contract.columns.iter_mut().find(|r| r.name == *slot) {
                rule.name = field.clone();
            }
            *slot = field.clone();
        }
    }
    contract
}

/// Load `input` and validate it against the configured contract.
pub fn run_validate(input: &Path, settings: &Settings) -> Result<ValidationOutcome, AppError> {
    let ingest = load_dataset(input, &settings.target_field)?;
    let outcome = validate_dataset(&ingest.dataset, &contract_for(settings));
    info!(
        passed = outcome.passed,
        errors = outcome.errors.len(),
        rows = outcome.summary.n_rows,
        "validated {}",
        input.display()
    );
    Ok(outcome)
}

/// Execute the full split pipeline on a CSV file.
pub fn run_split(
    input: &Path,
    settings: &Settings,
    config: &SplitConfiguration,
    strict: bool,
) -> Result<SplitRun, AppError> {
    let ingest = load_dataset(input, &settings.target_field)?;
    info!(
        rows = ingest.dataset.len(),
        skipped = ingest.row_errors.len(),
        derived_target = ingest.derived_target,
        "loaded {}",
        input.display()
    );

    let validation = if strict {
        let outcome = validate_dataset(&ingest.dataset, &contract_for(settings));
        if !outcome.passed {
            return Err(AppError::new(
                AppError::EXIT_CONFIG,
                format!("Data contract failed:\n- {}", outcome.errors.join("\n- ")),
            ));
        }
        debug!("data contract passed");
        Some(outcome)
    } else {
        None
    };

    let (split, summary) = split_dataset(&ingest.dataset, settings, config)?;
    let artifact = SplitArtifact::new(
        &settings.group_field,
        &settings.target_field,
        config,
        &summary,
        split.report,
    );

    Ok(SplitRun {
        ingest,
        validation,
        split,
        summary,
        artifact,
    })
}

/// Guarded split + summary of an in-memory dataset.
pub fn split_dataset(
    dataset: &Dataset,
    settings: &Settings,
    config: &SplitConfiguration,
) -> Result<(GuardedSplit, SplitSummary), AppError> {
    let split = guarded_split(dataset, &settings.group_field, &settings.target_field, config)?;
    let summary = summarize_split(dataset, &split.result, &settings.group_field, &settings.target_field)?;

    for label in SplitLabel::ALL {
        let stats = summary.get(label);
        debug!(
            partition = label.name(),
            rows = stats.rows,
            groups = stats.groups,
            target_rate = stats.target_rate,
            "partition"
        );
    }
    info!(
        train = summary.train.rows,
        validation = summary.validation.rows,
        test = summary.test.rows,
        "split complete; partitions are group-disjoint"
    );

    Ok((split, summary))
}

/// Write one CSV per partition into `dir`; returns the written paths.
pub fn export_partitions(
    dir: &Path,
    dataset: &Dataset,
    result: &SplitResult,
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::new(
            AppError::EXIT_INTERNAL,
            format!("Failed to create export dir '{}': {e}", dir.display()),
        )
    })?;

    let mut written = Vec::with_capacity(SplitLabel::ALL.len());
    for label in SplitLabel::ALL {
        let path = dir.join(format!("{}.csv", label.name()));
        write_dataset_csv(&path, &dataset.subset(result.rows(label)))?;
        debug!(partition = label.name(), path = %path.display(), "exported partition");
        written.push(path);
    }
    Ok(written)
}
