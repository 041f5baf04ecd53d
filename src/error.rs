use thiserror::Error;

use crate::leakage::DisjointnessReport;

/// Broad error categories surfaced by the splitting core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InsufficientData,
    LeakageDetected,
}

/// Errors raised by the splitter, the disjointness reporter and the leakage guard.
///
/// None of these are transient: callers fix their input and re-invoke.
#[derive(Debug, Clone, Error)]
pub enum SplitError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("configuration error: dataset has no field `{field}`")]
    MissingField { field: String },
    #[error("insufficient data for {stage}: need at least {required} distinct groups, found {found}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        found: usize,
    },
    #[error("group leakage detected: {0}")]
    LeakageDetected(Box<DisjointnessReport>),
}

impl SplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitError::Configuration(_) | SplitError::MissingField { .. } => ErrorKind::Configuration,
            SplitError::InsufficientData { .. } => ErrorKind::InsufficientData,
            SplitError::LeakageDetected(_) => ErrorKind::LeakageDetected,
        }
    }

    /// The disjointness report attached to a leakage failure.
    pub fn leakage_report(&self) -> Option<&DisjointnessReport> {
        match self {
            SplitError::LeakageDetected(report) => Some(report),
            _ => None,
        }
    }
}

/// Application-level error: a message plus the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub const EXIT_CONFIG: u8 = 2;
    pub const EXIT_DATA: u8 = 3;
    pub const EXIT_INTERNAL: u8 = 4;
    pub const EXIT_LEAKAGE: u8 = 5;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        let exit_code = match err.kind() {
            ErrorKind::Configuration => Self::EXIT_CONFIG,
            ErrorKind::InsufficientData => Self::EXIT_DATA,
            ErrorKind::LeakageDetected => Self::EXIT_LEAKAGE,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_a_configuration_error() {
        let err = SplitError::MissingField {
            field: "PATIENT_NBR".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("PATIENT_NBR"));
        assert_eq!(AppError::from(err).exit_code(), AppError::EXIT_CONFIG);
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let insufficient = SplitError::InsufficientData {
            stage: "three-way split",
            required: 3,
            found: 2,
        };
        assert_eq!(AppError::from(insufficient).exit_code(), AppError::EXIT_DATA);

        let leak = SplitError::LeakageDetected(Box::new(DisjointnessReport::default()));
        assert!(leak.leakage_report().is_some());
        assert_eq!(AppError::from(leak).exit_code(), AppError::EXIT_LEAKAGE);
    }
}
