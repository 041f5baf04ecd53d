//! Validate a dataset against a `DataContract`.
//!
//! Validation collects every problem instead of stopping at the first one, so a
//! single run shows the full picture. The only short-circuit is a missing
//! required column, since the remaining checks would be meaningless.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::data::contract::{ColumnType, DataContract};
use crate::domain::{Dataset, Value};

/// Max number of invalid codes quoted per column.
const INVALID_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub schema_version: String,
    pub n_rows: usize,
    pub n_cols: usize,
    /// Missing fraction per contract column present in the dataset.
    pub missingness: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub errors: Vec<String>,
    pub summary: ValidationSummary,
}

pub fn validate_dataset(dataset: &Dataset, contract: &DataContract) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut summary = ValidationSummary {
        schema_version: contract.schema_version.clone(),
        n_rows: dataset.len(),
        n_cols: dataset.fields().len(),
        missingness: BTreeMap::new(),
    };

    for rule in &contract.columns {
        if rule.required && !dataset.has_field(&rule.name) {
            errors.push(format!("Missing required column: {}", rule.name));
        }
    }
    for key in [&contract.primary_key, &contract.patient_key, &contract.target] {
        if !dataset.has_field(key) && contract.rule(key).is_none() {
            errors.push(format!("Missing required column: {key}"));
        }
    }
    if !errors.is_empty() {
        return ValidationOutcome {
            passed: false,
            errors,
            summary,
        };
    }

    check_primary_key(dataset, &contract.primary_key, &mut errors);
    check_patient_key(dataset, &contract.patient_key, &mut errors);
    check_binary_target(dataset, &contract.target, &mut errors);

    for rule in &contract.columns {
        let Ok(values) = dataset.column(&rule.name) else {
            continue;
        };
        let values: Vec<&Value> = values.collect();

        let missing = missing_fraction(&values);
        summary.missingness.insert(rule.name.clone(), missing);

        if let Some(max) = rule.max_missing {
            if missing > max {
                errors.push(format!(
                    "Column {} missingness {missing:.3} exceeds max allowed {max:.3}",
                    rule.name
                ));
            }
        }

        if rule.dtype == ColumnType::Int
            && values.iter().any(|v| !matches!(v, Value::Missing | Value::Int(_)))
        {
            errors.push(format!("Column {} must hold integer values", rule.name));
        }

        if let Some(allowed) = &rule.allowed_values {
            let invalid: BTreeSet<String> = values
                .iter()
                .filter(|v| !v.is_missing())
                .map(|v| v.to_string())
                .filter(|s| !allowed.contains(s))
                .collect();
            if !invalid.is_empty() {
                let sample: Vec<String> = invalid.into_iter().take(INVALID_SAMPLE).collect();
                errors.push(format!(
                    "Column {} has invalid codes (sample): {sample:?}",
                    rule.name
                ));
            }
        }
    }

    ValidationOutcome {
        passed: errors.is_empty(),
        errors,
        summary,
    }
}

fn check_primary_key(dataset: &Dataset, pk: &str, errors: &mut Vec<String>) {
    let Ok(values) = dataset.column(pk) else { return };
    let mut seen = HashSet::new();
    let mut has_missing = false;
    let mut has_duplicate = false;
    for value in values {
        match value.group_key() {
            None => has_missing = true,
            Some(key) => {
                if !seen.insert(key) {
                    has_duplicate = true;
                }
            }
        }
    }
    if has_missing {
        errors.push(format!("Primary key column '{pk}' contains null values."));
    }
    if has_duplicate {
        errors.push(format!("Primary key column '{pk}' is not unique."));
    }
}

fn check_patient_key(dataset: &Dataset, key: &str, errors: &mut Vec<String>) {
    let Ok(mut values) = dataset.column(key) else { return };
    if values.any(Value::is_missing) {
        errors.push(format!("Patient key column '{key}' contains null values."));
    }
}

fn check_binary_target(dataset: &Dataset, target: &str, errors: &mut Vec<String>) {
    let Ok(values) = dataset.column(target) else { return };
    let bad: BTreeSet<String> = values
        .filter(|v| !v.is_missing() && v.as_binary().is_none())
        .map(ToString::to_string)
        .collect();
    if !bad.is_empty() {
        let sample: Vec<String> = bad.into_iter().take(INVALID_SAMPLE).collect();
        errors.push(format!("Target '{target}' has non-binary values: {sample:?}"));
    }
}

fn missing_fraction(values: &[&Value]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| v.is_missing()).count() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::contract::readmission_contract;

    const FIELDS: [&str; 8] = [
        "ENCOUNTER_ID",
        "PATIENT_NBR",
        "READMITTED",
        "READMITTED_30D",
        "GENDER",
        "RACE",
        "AGE",
        "TIME_IN_HOSPITAL",
    ];

    fn row(enc: i64, patient: i64, code: &str, gender: &str) -> Vec<Value> {
        vec![
            Value::Int(enc),
            Value::Int(patient),
            Value::from(code),
            Value::Int(i64::from(code == "<30")),
            Value::from(gender),
            Value::from("Caucasian"),
            Value::from("[60-70)"),
            Value::Int(3),
        ]
    }

    #[test]
    fn clean_table_passes() {
        let ds = Dataset::from_records(
            FIELDS,
            vec![
                row(1, 10, "NO", "Female"),
                row(2, 10, "<30", "Female"),
                row(3, 11, ">30", "Male"),
            ],
        )
        .unwrap();
        let outcome = validate_dataset(&ds, &readmission_contract());
        assert!(outcome.passed, "{:?}", outcome.errors);
        assert_eq!(outcome.summary.missingness["GENDER"], 0.0);
    }

    #[test]
    fn duplicate_primary_key_and_bad_codes_fail() {
        let ds = Dataset::from_records(
            FIELDS,
            vec![row(1, 10, "NO", "Female"), row(1, 11, "MAYBE", "Robot")],
        )
        .unwrap();
        let outcome = validate_dataset(&ds, &readmission_contract());
        assert!(!outcome.passed);
        let text = outcome.errors.join("\n");
        assert!(text.contains("'ENCOUNTER_ID' is not unique"));
        assert!(text.contains("Column READMITTED has invalid codes"));
        assert!(text.contains("\"Robot\""));
    }

    #[test]
    fn missing_required_column_short_circuits() {
        let ds = Dataset::from_records(["PATIENT_NBR"], vec![vec![Value::Int(1)]]).unwrap();
        let outcome = validate_dataset(&ds, &readmission_contract());
        assert!(!outcome.passed);
        assert!(outcome.errors.iter().all(|e| e.starts_with("Missing required column")));
        assert!(outcome.summary.missingness.is_empty());
    }

    #[test]
    fn missing_patient_key_and_excess_missingness_fail() {
        let mut bad = row(2, 0, "NO", "Male");
        bad[1] = Value::Missing;
        bad[4] = Value::Missing;
        let ds = Dataset::from_records(FIELDS, vec![row(1, 10, "NO", "Female"), bad]).unwrap();
        let outcome = validate_dataset(&ds, &readmission_contract());
        let text = outcome.errors.join("\n");
        assert!(text.contains("Patient key column 'PATIENT_NBR' contains null values."));
        assert!(text.contains("Column GENDER missingness 0.500"));
    }

    #[test]
    fn non_binary_target_fails() {
        let mut bad = row(2, 11, "NO", "Male");
        bad[3] = Value::Int(3);
        let ds = Dataset::from_records(FIELDS, vec![row(1, 10, "NO", "Female"), bad]).unwrap();
        let outcome = validate_dataset(&ds, &readmission_contract());
        assert!(outcome.errors.iter().any(|e| e.contains("non-binary values: [\"3\"]")));
    }
}
