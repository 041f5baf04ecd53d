//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - sets up logging
//! - dispatches to the split / validate / synth / inspect handlers
//! - prints reports and writes artifacts

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InspectArgs, SplitArgs, SynthArgs, ValidateArgs};
use crate::data::{CohortConfig, generate_cohort};
use crate::error::AppError;
use crate::io::{SPLIT_ARTIFACT_FILENAME, read_split_artifact, write_dataset_csv, write_split_artifact};
use crate::report::{format_artifact, format_disjointness, format_split_summary, format_validation};
use crate::settings::Settings;
use crate::split::SplitConfiguration;

pub mod pipeline;

/// Entry point for the `readmit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);
    let settings = Settings::from_env();

    match cli.command {
        Command::Split(args) => handle_split(args, settings),
        Command::Validate(args) => handle_validate(args, settings),
        Command::Synth(args) => handle_synth(args),
        Command::Inspect(args) => handle_inspect(args, settings),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "readmit_split=debug" } else { "readmit_split=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_split(args: SplitArgs, settings: Settings) -> Result<(), AppError> {
    let config = split_config_from_args(&args)?;
    let mut settings = args.fields.apply(settings);
    if let Some(dir) = &args.artifacts_dir {
        settings.artifacts_dir = dir.clone();
    }

    let run = pipeline::run_split(&args.input, &settings, &config, args.strict)?;

    println!(
        "{}",
        format_split_summary(&run.summary, &config, &settings.group_field, &settings.target_field)
    );
    println!("{}", format_disjointness(&run.split.report));

    if !args.no_artifact {
        let path = artifact_path(args.artifact.as_deref(), &settings);
        write_split_artifact(&path, &run.artifact)?;
        info!(path = %path.display(), "wrote split artifact");
    }
    if let Some(dir) = &args.export_dir {
        let written = pipeline::export_partitions(dir, &run.ingest.dataset, &run.split.result)?;
        info!(files = written.len(), dir = %dir.display(), "exported partitions");
    }

    Ok(())
}

fn handle_validate(args: ValidateArgs, settings: Settings) -> Result<(), AppError> {
    let settings = args.fields.apply(settings);
    let outcome = pipeline::run_validate(&args.input, &settings)?;

    if args.json {
        let text = serde_json::to_string_pretty(&outcome).map_err(|e| {
            AppError::new(AppError::EXIT_INTERNAL, format!("Failed to encode outcome: {e}"))
        })?;
        println!("{text}");
    } else {
        println!("{}", format_validation(&outcome));
    }

    if !outcome.passed {
        return Err(AppError::new(
            AppError::EXIT_CONFIG,
            format!("Data contract failed with {} error(s).", outcome.errors.len()),
        ));
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = CohortConfig {
        rows: args.rows,
        patients: args.patients,
        positive_rate: args.positive_rate,
        seed: args.seed,
    };
    let dataset = generate_cohort(&config)?;
    write_dataset_csv(&args.output, &dataset)?;
    info!(
        rows = dataset.len(),
        patients = config.patients,
        path = %args.output.display(),
        "wrote synthetic cohort"
    );
    Ok(())
}

fn handle_inspect(args: InspectArgs, settings: Settings) -> Result<(), AppError> {
    let path = artifact_path(args.artifact.as_deref(), &settings);
    let artifact = read_split_artifact(&path)?;
    // Re-validate what was recorded, in case the file was edited by hand.
    artifact.configuration()?;

    println!("{}", format_artifact(&artifact));

    if !artifact.disjointness.is_disjoint() {
        warn!(path = %path.display(), "artifact records overlapping partitions");
        return Err(AppError::new(
            AppError::EXIT_LEAKAGE,
            format!("Split artifact '{}' records group leakage.", path.display()),
        ));
    }
    Ok(())
}

pub fn split_config_from_args(args: &SplitArgs) -> Result<SplitConfiguration, AppError> {
    Ok(SplitConfiguration::new(args.train, args.validation, args.test, args.seed)?)
}

fn artifact_path(explicit: Option<&Path>, settings: &Settings) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.artifacts_dir.join(SPLIT_ARTIFACT_FILENAME))
}
