//! Environment-backed defaults.
//!
//! `.env` is loaded first (if present), then the process environment is read.
//! CLI flags override anything set here.

use std::path::PathBuf;

pub const ENV_GROUP_FIELD: &str = "READMIT_GROUP_FIELD";
pub const ENV_TARGET_FIELD: &str = "READMIT_TARGET_FIELD";
pub const ENV_RECORD_FIELD: &str = "READMIT_RECORD_FIELD";
pub const ENV_ARTIFACTS_DIR: &str = "READMIT_ARTIFACTS_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Field whose values define groups (one patient = one group).
    pub group_field: String,
    /// Binary outcome field.
    pub target_field: String,
    /// Per-record identifier (primary key of the table).
    pub record_field: String,
    pub artifacts_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            group_field: "PATIENT_NBR".to_string(),
            target_field: "READMITTED_30D".to_string(),
            record_field: "ENCOUNTER_ID".to_string(),
            artifacts_dir: PathBuf::from("artifacts"),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; blank values fall back to
    /// the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            group_field: get(ENV_GROUP_FIELD).unwrap_or(defaults.group_field),
            target_field: get(ENV_TARGET_FIELD).unwrap_or(defaults.target_field),
            record_field: get(ENV_RECORD_FIELD).unwrap_or(defaults.record_field),
            artifacts_dir: get(ENV_ARTIFACTS_DIR).map(PathBuf::from).unwrap_or(defaults.artifacts_dir),
        }
    }
}
