//! Data contract for the diabetes readmission encounter table.

/// Expected value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Str,
}

/// Rule for one column.
#[derive(Debug, Clone)]
pub struct ColumnRule {
    pub name: String,
    pub dtype: ColumnType,
    pub required: bool,
    pub allowed_values: Option<Vec<String>>,
    /// Maximum fraction of missing cells, in `[0, 1]`.
    pub max_missing: Option<f64>,
}

impl ColumnRule {
    pub fn new(name: &str, dtype: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            dtype,
            required: true,
            allowed_values: None,
            max_missing: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn max_missing(mut self, fraction: f64) -> Self {
        self.max_missing = Some(fraction);
        self
    }
}

#[derive(Debug, Clone)]
pub struct DataContract {
    pub schema_version: String,
    pub primary_key: String,
    pub patient_key: String,
    pub target: String,
    pub columns: Vec<ColumnRule>,
}

impl DataContract {
    pub fn rule(&self, name: &str) -> Option<&ColumnRule> {
        self.columns.iter().find(|r| r.name == name)
    }
}

/// Contract for the UCI "diabetes 130-US hospitals" readmission table.
///
/// `?` is read as a missing cell at ingest, so it is not listed as a race code.
pub fn readmission_contract() -> DataContract {
    const GENDER: [&str; 3] = ["Male", "Female", "Unknown/Invalid"];
    const RACE: [&str; 6] = ["Caucasian", "AfricanAmerican", "Hispanic", "Asian", "Other", "Unknown"];
    const READMITTED: [&str; 3] = ["NO", "<30", ">30"];

    DataContract {
        schema_version: "1.0".to_string(),
        primary_key: "ENCOUNTER_ID".to_string(),
        patient_key: "PATIENT_NBR".to_string(),
        target: "READMITTED_30D".to_string(),
        columns: vec![
            ColumnRule::new("ENCOUNTER_ID", ColumnType::Int).max_missing(0.0),
            ColumnRule::new("PATIENT_NBR", ColumnType::Int).max_missing(0.0),
            ColumnRule::new("READMITTED", ColumnType::Str).allowed(&READMITTED),
            ColumnRule::new("READMITTED_30D", ColumnType::Int),
            ColumnRule::new("GENDER", ColumnType::Str).allowed(&GENDER).max_missing(0.05),
            ColumnRule::new("RACE", ColumnType::Str)
                .optional()
                .allowed(&RACE)
                .max_missing(0.20),
            ColumnRule::new("AGE", ColumnType::Str).max_missing(0.05),
            ColumnRule::new("TIME_IN_HOSPITAL", ColumnType::Int).max_missing(0.0),
        ],
    }
}
