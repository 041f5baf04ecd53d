//! Two-stage group-aware splitter.
//!
//! Stage 1 splits all entity groups into train vs remainder; stage 2 splits the
//! remainder into validation vs test. Both stages use the same grouped
//! shuffle-split primitive, so every group lands wholly in one partition.

use std::collections::BTreeMap;

use crate::domain::{Dataset, GroupKey, PartitionViews, SplitLabel};
use crate::error::SplitError;
use crate::split::config::SplitConfiguration;
use crate::split::shuffle::{GroupSummary, grouped_shuffle_split, stage_seed};

/// Fewest distinct groups that can populate three disjoint partitions.
///
/// A configuration with zero fractions needs one group per non-zero partition
/// instead; see `SplitConfiguration::populated_partitions`.
pub const MIN_GROUPS: usize = 3;

/// Row indices (ascending) for each partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitResult {
    pub fn rows(&self, label: SplitLabel) -> &[usize] {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Validation => &self.validation,
            SplitLabel::Test => &self.test,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Borrowed per-partition views over `dataset`.
    pub fn views<'a>(&'a self, dataset: &'a Dataset) -> PartitionViews<'a> {
        PartitionViews {
            train: dataset.view_rows(&self.train),
            validation: dataset.view_rows(&self.validation),
            test: dataset.view_rows(&self.test),
        }
    }

    /// Copy each partition out into its own dataset.
    pub fn materialize(&self, dataset: &Dataset) -> (Dataset, Dataset, Dataset) {
        (
            dataset.subset(&self.train),
            dataset.subset(&self.validation),
            dataset.subset(&self.test),
        )
    }
}

/// Split `dataset` into group-disjoint train/validation/test partitions.
///
/// The assignment depends only on the configured seed and the multiset of
/// `(group, target)` pairs: reordering rows does not change which groups land
/// where. Partitions with a zero fraction are left empty; every other partition
/// gets at least one group.
pub fn group_split(
    dataset: &Dataset,
    group_field: &str,
    target_field: &str,
    config: &SplitConfiguration,
) -> Result<SplitResult, SplitError> {
    let groups = summarize_groups(dataset, group_field, target_field)?;
    let required = config.populated_partitions();
    if groups.len() < required {
        return Err(SplitError::InsufficientData {
            stage: "three-way split",
            required,
            found: groups.len(),
        });
    }

    let all: Vec<&GroupSummary> = groups.iter().collect();
    let seed = config.random_seed();
    let min_groups = |label| usize::from(config.is_populated(label));

    // 1) Train vs remainder. The remainder must still be splittable in two.
    let stage1 = grouped_shuffle_split(
        &all,
        config.train_fraction(),
        stage_seed(seed, 1),
        min_groups(SplitLabel::Train),
        min_groups(SplitLabel::Validation) + min_groups(SplitLabel::Test),
    );

    // 2) Validation vs test within the remainder, in canonical group order.
    let mut remainder_pos = stage1.right;
    remainder_pos.sort_unstable();
    let remainder: Vec<&GroupSummary> = remainder_pos.iter().map(|&pos| all[pos]).collect();
    let stage2 = grouped_shuffle_split(
        &remainder,
        config.validation_share_of_remainder(),
        stage_seed(seed, 2),
        min_groups(SplitLabel::Validation),
        min_groups(SplitLabel::Test),
    );

    Ok(SplitResult {
        train: collect_rows(&all, &stage1.left),
        validation: collect_rows(&remainder, &stage2.left),
        test: collect_rows(&remainder, &stage2.right),
    })
}

/// Group rows by identifier, sorted by `GroupKey`.
fn summarize_groups(
    dataset: &Dataset,
    group_field: &str,
    target_field: &str,
) -> Result<Vec<GroupSummary>, SplitError> {
    let group_col = dataset.require_field(group_field)?;
    let target_col = dataset.require_field(target_field)?;

    let mut by_key: BTreeMap<GroupKey, GroupSummary> = BTreeMap::new();
    for (row, record) in dataset.records().iter().enumerate() {
        let key = record[group_col].group_key().ok_or_else(|| {
            SplitError::Configuration(format!(
                "row {row}: field `{group_field}` has no group identifier"
            ))
        })?;
        let label = record[target_col].as_binary().ok_or_else(|| {
            SplitError::Configuration(format!(
                "row {row}: field `{target_field}` must be 0 or 1 (got `{}`)",
                record[target_col]
            ))
        })?;

        let summary = by_key.entry(key.clone()).or_insert_with(|| GroupSummary {
            key,
            rows: Vec::new(),
            positives: 0,
        });
        summary.rows.push(row);
        summary.positives += usize::from(label);
    }

    Ok(by_key.into_values().collect())
}

fn collect_rows(groups: &[&GroupSummary], positions: &[usize]) -> Vec<usize> {
    let mut rows: Vec<usize> = positions
        .iter()
        .flat_map(|&pos| groups[pos].rows.iter().copied())
        .collect();
    rows.sort_unstable();
    rows
}
