use std::fs;
use std::path::Path;

use readmit_split::app::pipeline::{export_partitions, run_split, run_validate};
use readmit_split::data::{CohortConfig, generate_cohort};
use readmit_split::domain::SplitLabel;
use readmit_split::error::AppError;
use readmit_split::io::{SPLIT_ARTIFACT_SCHEMA_VERSION, load_dataset, read_split_artifact, write_dataset_csv, write_split_artifact};
use readmit_split::settings::Settings;
use readmit_split::split::SplitConfiguration;

fn write_cohort(dir: &Path) -> std::path::PathBuf {
    let ds = generate_cohort(&CohortConfig {
        rows: 1_500,
        patients: 450,
        positive_rate: 0.11,
        seed: 3,
    })
    .unwrap();
    let path = dir.join("encounters.csv");
    write_dataset_csv(&path, &ds).unwrap();
    path
}

#[test]
fn strict_split_writes_a_readable_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_cohort(dir.path());
    let settings = Settings::default();
    let config = SplitConfiguration::default();

    let run = run_split(&input, &settings, &config, true).unwrap();
    assert!(run.validation.as_ref().is_some_and(|v| v.passed));
    assert_eq!(run.summary.total_rows, 1_500);
    assert!(run.split.report.is_disjoint());

    let artifact_path = dir.path().join("artifacts").join("split_config.json");
    write_split_artifact(&artifact_path, &run.artifact).unwrap();
    let back = read_split_artifact(&artifact_path).unwrap();

    assert_eq!(back, run.artifact);
    assert_eq!(back.schema_version, SPLIT_ARTIFACT_SCHEMA_VERSION);
    assert_eq!(back.row_counts.total, 1_500);
    assert_eq!(
        back.row_counts.train + back.row_counts.validation + back.row_counts.test,
        1_500
    );
    assert_eq!(back.configuration().unwrap(), config);
}

#[test]
fn rerunning_with_the_artifact_configuration_reproduces_the_split() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_cohort(dir.path());
    let settings = Settings::default();

    let first = run_split(&input, &settings, &SplitConfiguration::new(0.6, 0.2, 0.2, 99).unwrap(), false).unwrap();
    let config = first.artifact.configuration().unwrap();
    let second = run_split(&input, &settings, &config, false).unwrap();

    assert_eq!(first.split.result, second.split.result);
    assert_eq!(first.artifact.row_counts, second.artifact.row_counts);
}

#[test]
fn exported_partitions_reload_to_the_full_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_cohort(dir.path());
    let settings = Settings::default();
    let run = run_split(&input, &settings, &SplitConfiguration::default(), false).unwrap();

    let out = dir.path().join("parts");
    let written = export_partitions(&out, &run.ingest.dataset, &run.split.result).unwrap();
    assert_eq!(written.len(), 3);

    let mut total = 0;
    for (label, path) in SplitLabel::ALL.into_iter().zip(&written) {
        assert!(path.ends_with(format!("{}.csv", label.name())));
        let part = load_dataset(path, &settings.target_field).unwrap();
        assert_eq!(part.dataset.len(), run.split.result.rows(label).len());
        total += part.dataset.len();
    }
    assert_eq!(total, 1_500);
}

#[test]
fn raw_readmitted_column_is_enough_to_split() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    let mut text = String::from("encounter_id,patient_nbr,readmitted\n");
    for i in 0..60 {
        let code = match i % 5 {
            0 => "<30",
            1 => ">30",
            _ => "NO",
        };
        text.push_str(&format!("{},{},{code}\n", 1000 + i, i / 3));
    }
    fs::write(&input, text).unwrap();

    let run = run_split(&input, &Settings::default(), &SplitConfiguration::default(), false).unwrap();
    assert!(run.ingest.derived_target);
    assert_eq!(run.summary.total_rows, 60);
    assert!((run.summary.overall_target_rate - 0.2).abs() < 1e-9);
}

#[test]
fn strict_mode_rejects_contract_violations() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "ENCOUNTER_ID,PATIENT_NBR,READMITTED_30D\n1,10,0\n1,11,1\n2,12,0\n").unwrap();

    let err = run_split(&input, &Settings::default(), &SplitConfiguration::default(), true).unwrap_err();
    assert_eq!(err.exit_code(), AppError::EXIT_CONFIG);
    assert!(err.message().contains("Missing required column"));

    let outcome = run_validate(&input, &Settings::default()).unwrap();
    assert!(!outcome.passed);
}

#[test]
fn too_few_patients_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.csv");
    fs::write(&input, "ENCOUNTER_ID,PATIENT_NBR,READMITTED_30D\n1,10,0\n2,10,1\n3,11,0\n").unwrap();

    let err = run_split(&input, &Settings::default(), &SplitConfiguration::default(), false).unwrap_err();
    assert_eq!(err.exit_code(), AppError::EXIT_DATA);
}
