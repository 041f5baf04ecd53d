//! Command-line parsing for the group-aware readmission splitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! splitting and I/O code. Dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::Settings;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "readmit",
    version,
    about = "Leakage-safe, patient-grouped train/validation/test splits"
)]
pub struct Cli {
    /// Log at debug level (unless RUST_LOG is set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a CSV into train/validation/test by group, verify disjointness and
    /// write the split artifact.
    Split(SplitArgs),
    /// Check a CSV against the readmission data contract.
    Validate(ValidateArgs),
    /// Generate a synthetic encounter table.
    Synth(SynthArgs),
    /// Print a previously written split artifact.
    Inspect(InspectArgs),
}

/// Field-name overrides shared by the commands that read a table.
///
/// Unset flags fall back to the environment (`READMIT_*`), then to the
/// readmission defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct FieldArgs {
    /// Grouping field (one group per patient).
    #[arg(long, value_name = "FIELD")]
    pub group_field: Option<String>,

    /// Binary target field.
    #[arg(long, value_name = "FIELD")]
    pub target_field: Option<String>,

    /// Per-record key field.
    #[arg(long, value_name = "FIELD")]
    pub record_field: Option<String>,
}

impl FieldArgs {
    /// Apply these overrides on top of `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(field) = &self.group_field {
            settings.group_field = field.clone();
        }
        if let Some(field) = &self.target_field {
            settings.target_field = field.clone();
        }
        if let Some(field) = &self.record_field {
            settings.record_field = field.clone();
        }
        settings
    }
}

#[derive(Debug, Args, Clone)]
pub struct SplitArgs {
    /// Input CSV (one row per encounter).
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Fraction of rows targeted for training.
    #[arg(long, default_value_t = 0.70)]
    pub train: f64,

    /// Fraction of rows targeted for validation.
    #[arg(long, default_value_t = 0.15)]
    pub validation: f64,

    /// Fraction of rows targeted for test.
    #[arg(long, default_value_t = 0.15)]
    pub test: f64,

    /// Random seed; the same seed and data always give the same split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Artifact path (default: <artifacts-dir>/split_config.json).
    #[arg(long, value_name = "JSON")]
    pub artifact: Option<PathBuf>,

    /// Directory for the split artifact (overrides READMIT_ARTIFACTS_DIR).
    #[arg(long, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Do not write the split artifact.
    #[arg(long, conflicts_with = "artifact")]
    pub no_artifact: bool,

    /// Write train.csv, validation.csv and test.csv into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Validate the input against the data contract before splitting.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ValidateArgs {
    /// Input CSV.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Print the outcome as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of encounters.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub rows: usize,

    /// Number of distinct patients.
    #[arg(long, default_value_t = 3_000)]
    pub patients: usize,

    /// Expected share of 30-day readmissions.
    #[arg(long, default_value_t = 0.11)]
    pub positive_rate: f64,

    /// Random seed for generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    /// Artifact JSON (default: <artifacts-dir>/split_config.json).
    #[arg(long, value_name = "JSON")]
    pub artifact: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn split_defaults() {
        let cli = Cli::parse_from(["readmit", "split", "--input", "data.csv"]);
        let Command::Split(args) = cli.command else {
            panic!("expected split");
        };
        assert_eq!((args.train, args.validation, args.test, args.seed), (0.70, 0.15, 0.15, 42));
        assert!(!args.strict && !cli.verbose);
        assert!(args.fields.group_field.is_none());
    }

    #[test]
    fn field_overrides_apply_over_settings() {
        let cli = Cli::parse_from([
            "readmit",
            "-v",
            "validate",
            "-i",
            "x.csv",
            "--group-field",
            "MEMBER_ID",
        ]);
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(cli.verbose);
        let settings = args.fields.apply(Settings::default());
        assert_eq!(settings.group_field, "MEMBER_ID");
        assert_eq!(settings.target_field, "READMITTED_30D");
    }
}
