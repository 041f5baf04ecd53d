//! CSV ingest and normalization.
//!
//! Turns a raw encounter export into a `Dataset` the splitting core can trust:
//! - **Normalized headers** (BOM stripped, uppercase, spaces/hyphens → `_`)
//! - **Coerced cells** (missing markers, integers, floats, text)
//! - **Derived target**: `READMITTED_30D` from the raw `READMITTED` code when absent
//! - **Row-level validation** (skip malformed rows, but report what happened)

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{Dataset, Value};
use crate::error::AppError;

/// Raw readmission outcome column.
pub const RAW_OUTCOME_FIELD: &str = "READMITTED";
/// Raw outcome code meaning "readmitted within 30 days".
pub const WITHIN_30_DAYS_CODE: &str = "<30";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the normalized table plus bookkeeping.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Whether the target field was derived from `READMITTED`.
    pub derived_target: bool,
}

/// Load a CSV into a normalized `Dataset`.
///
/// If `target_field` is not present but a raw `READMITTED` column is, the
/// target is derived as `1` for `<30` and `0` otherwise.
pub fn load_dataset(path: &Path, target_field: &str) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            AppError::EXIT_CONFIG,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(AppError::EXIT_CONFIG, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let fields: Vec<String> = headers.iter().map(normalize_header_name).collect();
    let mut dataset = Dataset::new(fields.clone())?;

    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, fields.len()) {
            Ok(values) => dataset.push_record(values)?,
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!(
            path = %path.display(),
            skipped = row_errors.len(),
            "skipped malformed CSV rows"
        );
    }

    let derived_target = if dataset.has_field(target_field) {
        false
    } else if dataset.has_field(RAW_OUTCOME_FIELD) {
        derive_target(&mut dataset, target_field)?;
        true
    } else {
        false
    };

    debug!(
        path = %path.display(),
        rows = dataset.len(),
        fields = dataset.fields().len(),
        derived_target,
        "ingested CSV"
    );

    Ok(IngestedTable {
        dataset,
        row_errors,
        rows_read,
        derived_target,
    })
}

/// Write a dataset as CSV (header + one line per record).
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            AppError::EXIT_INTERNAL,
            format!("Failed to create CSV '{}': {e}", path.display()),
        )
    })?;

    writer
        .write_record(dataset.fields())
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Failed to write CSV header: {e}")))?;

    for record in dataset.records() {
        writer
            .write_record(record.iter().map(ToString::to_string))
            .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Normalize a header to the upper-snake form the rest of the pipeline expects.
pub fn normalize_header_name(name: &str) -> String {
    // Excel sometimes emits a BOM on the first header; without stripping it the
    // first column would never match by name.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_uppercase().replace([' ', '-'], "_")
}

fn parse_row(record: &StringRecord, width: usize) -> Result<Vec<Value>, String> {
    if record.len() != width {
        return Err(format!("Expected {width} fields, found {}.", record.len()));
    }
    Ok(record.iter().map(Value::parse).collect())
}

fn derive_target(dataset: &mut Dataset, target_field: &str) -> Result<(), AppError> {
    let values: Vec<Value> = dataset
        .column(RAW_OUTCOME_FIELD)?
        .map(|v| {
            let within_30 = v.as_text().is_some_and(|s| s == WITHIN_30_DAYS_CODE);
            Value::Int(i64::from(within_30))
        })
        .collect();
    dataset.add_field(target_field, values)?;
    Ok(())
}
