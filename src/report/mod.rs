//! Reporting utilities: per-partition summaries and formatted terminal output.

pub mod format;

pub use format::*;

use std::collections::HashSet;

use crate::domain::{Dataset, DatasetView, SplitLabel};
use crate::error::SplitError;
use crate::split::SplitResult;

/// Row/group/target statistics for one partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionStats {
    pub rows: usize,
    pub groups: usize,
    pub positives: usize,
    /// `positives / rows`, or 0 for an empty partition.
    pub target_rate: f64,
}

/// Statistics for all three partitions plus the whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub train: PartitionStats,
    pub validation: PartitionStats,
    pub test: PartitionStats,
    pub total_rows: usize,
    pub overall_target_rate: f64,
}

impl SplitSummary {
    pub fn get(&self, label: SplitLabel) -> &PartitionStats {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Validation => &self.validation,
            SplitLabel::Test => &self.test,
        }
    }

    /// Realized row fraction of one partition.
    pub fn row_fraction(&self, label: SplitLabel) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.get(label).rows as f64 / self.total_rows as f64
    }
}

/// Summarize a split of `dataset`.
pub fn summarize_split(
    dataset: &Dataset,
    result: &SplitResult,
    group_field: &str,
    target_field: &str,
) -> Result<SplitSummary, SplitError> {
    let views = result.views(dataset);
    let overall = partition_stats(dataset.view(), group_field, target_field)?;

    Ok(SplitSummary {
        train: partition_stats(views.train, group_field, target_field)?,
        validation: partition_stats(views.validation, group_field, target_field)?,
        test: partition_stats(views.test, group_field, target_field)?,
        total_rows: overall.rows,
        overall_target_rate: overall.target_rate,
    })
}

fn partition_stats(view: DatasetView<'_>, group_field: &str, target_field: &str) -> Result<PartitionStats, SplitError> {
    let groups: HashSet<_> = view.column(group_field)?.filter_map(|v| v.group_key()).collect();
    let positives = view
        .column(target_field)?
        .filter(|v| v.as_binary() == Some(1))
        .count();
    let rows = view.len();
    let target_rate = if rows == 0 { 0.0 } else { positives as f64 / rows as f64 };

    Ok(PartitionStats {
        rows,
        groups: groups.len(),
        positives,
        target_rate,
    })
}
