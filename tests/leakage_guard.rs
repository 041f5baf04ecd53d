use readmit_split::domain::{Dataset, PartitionViews, SplitLabel, Value};
use readmit_split::error::{AppError, ErrorKind, SplitError};
use readmit_split::leakage::{assert_disjoint, disjointness_report};

fn encounters(patients: &[i64]) -> Dataset {
    Dataset::from_records(
        ["ENCOUNTER_ID", "PATIENT_NBR", "READMITTED_30D"],
        patients
            .iter()
            .enumerate()
            .map(|(i, &p)| vec![Value::Int(i as i64), Value::Int(p), Value::Int(0)])
            .collect(),
    )
    .unwrap()
}

#[test]
fn patient_shared_between_train_and_test_is_rejected() {
    let train = encounters(&[1, 2, 3]);
    let validation = encounters(&[4, 5]);
    let test = encounters(&[3, 6]);
    let views = PartitionViews::new(&train, &validation, &test);

    let err = assert_disjoint(&views, "PATIENT_NBR").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LeakageDetected);

    let report = err.leakage_report().copied().unwrap();
    assert_eq!(report.overlap(SplitLabel::Train, SplitLabel::Test), 1);
    assert_eq!(report.overlap(SplitLabel::Train, SplitLabel::Validation), 0);
    assert_eq!(report.overlap(SplitLabel::Validation, SplitLabel::Test), 0);

    let app: AppError = err.into();
    assert_eq!(app.exit_code(), AppError::EXIT_LEAKAGE);
}

#[test]
fn clean_partitions_pass_and_return_the_report() {
    let train = encounters(&[1, 1, 2]);
    let validation = encounters(&[3]);
    let test = encounters(&[4, 4]);
    let views = PartitionViews::new(&train, &validation, &test);

    let report = assert_disjoint(&views, "PATIENT_NBR").unwrap();
    assert_eq!(report, disjointness_report(&views, "PATIENT_NBR").unwrap());
    assert_eq!((report.train_groups, report.validation_groups, report.test_groups), (2, 1, 1));
    assert!(report.is_disjoint());
}

#[test]
fn integral_float_and_integer_keys_name_the_same_patient() {
    let train = Dataset::from_records(["PATIENT_NBR"], vec![vec![Value::from("7")], vec![Value::Int(8)]]).unwrap();
    let validation = Dataset::from_records(["PATIENT_NBR"], vec![vec![Value::Float(8.0)]]).unwrap();
    let test = Dataset::from_records(["PATIENT_NBR"], vec![vec![Value::Int(9)]]).unwrap();
    let views = PartitionViews::new(&train, &validation, &test);

    let report = disjointness_report(&views, "PATIENT_NBR").unwrap();
    assert_eq!(report.overlap(SplitLabel::Train, SplitLabel::Validation), 1);
    assert_eq!(report.overlap(SplitLabel::Train, SplitLabel::Test), 0);
}

#[test]
fn missing_group_field_is_a_configuration_error() {
    let ds = encounters(&[1, 2, 3]);
    let views = PartitionViews::new(&ds, &ds, &ds);
    let err = assert_disjoint(&views, "MEMBER_ID").unwrap_err();
    assert!(matches!(err, SplitError::MissingField { ref field } if field == "MEMBER_ID"));
}
