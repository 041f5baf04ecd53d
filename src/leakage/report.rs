//! Patient/group disjointness report.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{DatasetView, GroupKey, PartitionViews, SplitLabel};
use crate::error::SplitError;

/// Distinct group counts per partition and pairwise overlap counts.
///
/// For a correct split every `overlap_*` field is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjointnessReport {
    pub train_groups: usize,
    pub validation_groups: usize,
    pub test_groups: usize,
    pub overlap_train_validation: usize,
    pub overlap_train_test: usize,
    pub overlap_validation_test: usize,
}

impl DisjointnessReport {
    pub fn group_count(&self, label: SplitLabel) -> usize {
        match label {
            SplitLabel::Train => self.train_groups,
            SplitLabel::Validation => self.validation_groups,
            SplitLabel::Test => self.test_groups,
        }
    }

    /// Overlap between two partitions (order-insensitive).
    pub fn overlap(&self, a: SplitLabel, b: SplitLabel) -> usize {
        use SplitLabel::*;
        match (a.min(b), a.max(b)) {
            (Train, Validation) => self.overlap_train_validation,
            (Train, Test) => self.overlap_train_test,
            (Validation, Test) => self.overlap_validation_test,
            (same, _) => self.group_count(same),
        }
    }

    /// Every unordered partition pair with its overlap count.
    pub fn overlaps(&self) -> [(SplitLabel, SplitLabel, usize); 3] {
        [
            (SplitLabel::Train, SplitLabel::Validation, self.overlap_train_validation),
            (SplitLabel::Train, SplitLabel::Test, self.overlap_train_test),
            (SplitLabel::Validation, SplitLabel::Test, self.overlap_validation_test),
        ]
    }

    pub fn is_disjoint(&self) -> bool {
        self.overlaps().iter().all(|&(_, _, n)| n == 0)
    }
}

impl fmt::Display for DisjointnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "groups train={} validation={} test={}; overlap train/validation={} train/test={} validation/test={}",
            self.train_groups,
            self.validation_groups,
            self.test_groups,
            self.overlap_train_validation,
            self.overlap_train_test,
            self.overlap_validation_test,
        )
    }
}

/// Count distinct groups per partition and pairwise overlaps.
///
/// Missing group values are ignored. Fails only if a partition lacks
/// `group_field`.
pub fn disjointness_report(
    partitions: &PartitionViews<'_>,
    group_field: &str,
) -> Result<DisjointnessReport, SplitError> {
    let train = group_set(partitions.train, group_field)?;
    let validation = group_set(partitions.validation, group_field)?;
    let test = group_set(partitions.test, group_field)?;

    Ok(DisjointnessReport {
        train_groups: train.len(),
        validation_groups: validation.len(),
        test_groups: test.len(),
        overlap_train_validation: train.intersection(&validation).count(),
        overlap_train_test: train.intersection(&test).count(),
        overlap_validation_test: validation.intersection(&test).count(),
    })
}

fn group_set(view: DatasetView<'_>, group_field: &str) -> Result<HashSet<GroupKey>, SplitError> {
    Ok(view.column(group_field)?.filter_map(|v| v.group_key()).collect())
}
