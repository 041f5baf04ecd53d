//! Formatted terminal output.
//!
//! Formatting lives here so the core stays free of presentation concerns and
//! output changes stay localized.

use crate::data::validate::ValidationOutcome;
use crate::domain::SplitLabel;
use crate::io::artifact::SplitArtifact;
use crate::leakage::DisjointnessReport;
use crate::report::SplitSummary;
use crate::split::SplitConfiguration;

/// Format the split run summary (configuration, sizes, target rates).
pub fn format_split_summary(
    summary: &SplitSummary,
    config: &SplitConfiguration,
    group_field: &str,
    target_field: &str,
) -> String {
    let mut out = String::new();

    out.push_str("=== readmit - Group-Aware Split ===\n");
    out.push_str(&format!("Group: {group_field} | Target: {target_field}\n"));
    out.push_str(&format!(
        "Config: train={:.3} validation={:.3} test={:.3} seed={}\n",
        config.train_fraction(),
        config.validation_fraction(),
        config.test_fraction(),
        config.random_seed(),
    ));
    out.push_str(&format!(
        "Rows: n={} | target rate={:.4}\n\n",
        summary.total_rows, summary.overall_target_rate
    ));

    out.push_str(
        format!(
            "{:<12} {:>10} {:>10} {:>10} {:>12}\n",
            "partition", "rows", "share", "groups", "target_rate"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<10} {:-<10} {:-<10} {:-<12}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for label in SplitLabel::ALL {
        let stats = summary.get(label);
        out.push_str(
            format!(
                "{:<12} {:>10} {:>10.4} {:>10} {:>12.4}\n",
                label.name(),
                stats.rows,
                summary.row_fraction(label),
                stats.groups,
                stats.target_rate,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the disjointness report.
pub fn format_disjointness(report: &DisjointnessReport) -> String {
    let mut out = String::new();
    out.push_str("=== Group Disjointness ===\n");
    for label in SplitLabel::ALL {
        out.push_str(&format!("{:<12} groups={}\n", label.name(), report.group_count(label)));
    }
    for (a, b, n) in report.overlaps() {
        let flag = if n == 0 { "ok" } else { "LEAK" };
        out.push_str(&format!("overlap {a}/{b}: {n} [{flag}]\n"));
    }
    out
}

/// Format a data-contract validation outcome.
pub fn format_validation(outcome: &ValidationOutcome) -> String {
    let mut out = String::new();
    let status = if outcome.passed { "PASSED" } else { "FAILED" };
    out.push_str(&format!(
        "=== Data Contract (schema {}) : {status} ===\n",
        outcome.summary.schema_version
    ));
    out.push_str(&format!(
        "Rows: {} | Columns: {}\n",
        outcome.summary.n_rows, outcome.summary.n_cols
    ));
    for (column, missing) in &outcome.summary.missingness {
        out.push_str(&format!("  {column:<20} missing={missing:.3}\n"));
    }
    for err in &outcome.errors {
        out.push_str(&format!("- {err}\n"));
    }
    out
}

/// Format a previously written split artifact.
pub fn format_artifact(artifact: &SplitArtifact) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Split artifact (schema {}) ===\n",
        artifact.schema_version
    ));
    out.push_str(&format!("Created: {}\n", artifact.created_utc.to_rfc3339()));
    out.push_str(&format!(
        "Group: {} | Target: {} | Seed: {}\n",
        artifact.group_field, artifact.target_field, artifact.random_seed
    ));
    out.push_str(&format!(
        "Fractions: train={:.3} validation={:.3} test={:.3}\n",
        artifact.fractions.train, artifact.fractions.validation, artifact.fractions.test
    ));
    out.push_str(&format!(
        "Rows: train={} validation={} test={} (total {})\n",
        artifact.row_counts.train,
        artifact.row_counts.validation,
        artifact.row_counts.test,
        artifact.row_counts.total
    ));
    out.push_str(&format!(
        "Target rate: train={:.4} validation={:.4} test={:.4} overall={:.4}\n",
        artifact.target_rates.train,
        artifact.target_rates.validation,
        artifact.target_rates.test,
        artifact.target_rates.overall
    ));
    out.push('\n');
    out.push_str(&format_disjointness(&artifact.disjointness));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PartitionStats;

    #[test]
    fn disjointness_flags_leaks() {
        let report = DisjointnessReport {
            train_groups: 3,
            validation_groups: 2,
            test_groups: 2,
            overlap_train_validation: 0,
            overlap_train_test: 1,
            overlap_validation_test: 0,
        };
        let text = format_disjointness(&report);
        assert!(text.contains("overlap train/test: 1 [LEAK]"));
        assert!(text.contains("overlap train/validation: 0 [ok]"));
    }

    #[test]
    fn summary_lists_every_partition() {
        let stats = PartitionStats {
            rows: 10,
            groups: 4,
            positives: 1,
            target_rate: 0.1,
        };
        let summary = SplitSummary {
            train: stats,
            validation: stats,
            test: stats,
            total_rows: 30,
            overall_target_rate: 0.1,
        };
        let text = format_split_summary(&summary, &SplitConfiguration::default(), "PATIENT_NBR", "READMITTED_30D");
        for label in SplitLabel::ALL {
            assert!(text.contains(label.name()));
        }
        assert!(text.contains("seed=42"));
        assert!(text.lines().all(|l| l == l.trim_end()));
    }
}
