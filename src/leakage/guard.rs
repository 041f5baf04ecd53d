//! Leakage guard: the mandatory gate between splitting and anything that fits
//! or evaluates a model.

use crate::domain::{Dataset, PartitionViews};
use crate::error::SplitError;
use crate::leakage::report::{DisjointnessReport, disjointness_report};
use crate::split::{SplitConfiguration, SplitResult, group_split};

/// Fail with `LeakageDetected` if any two partitions share a group.
///
/// Returns the (clean) report on success so callers can persist it.
pub fn assert_disjoint(
    partitions: &PartitionViews<'_>,
    group_field: &str,
) -> Result<DisjointnessReport, SplitError> {
    let report = disjointness_report(partitions, group_field)?;
    if !report.is_disjoint() {
        return Err(SplitError::LeakageDetected(Box::new(report)));
    }
    Ok(report)
}

/// A split that has already passed the leakage guard.
#[derive(Debug, Clone)]
pub struct GuardedSplit {
    pub result: SplitResult,
    pub report: DisjointnessReport,
}

/// Split, then run the guard on the result.
///
/// This is the only entry point orchestration code should use to obtain
/// partitions.
pub fn guarded_split(
    dataset: &Dataset,
    group_field: &str,
    target_field: &str,
    config: &SplitConfiguration,
) -> Result<GuardedSplit, SplitError> {
    let result = group_split(dataset, group_field, target_field, config)?;
    let report = assert_disjoint(&result.views(dataset), group_field)?;
    Ok(GuardedSplit { result, report })
}
