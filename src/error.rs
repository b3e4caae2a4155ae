//! Error type shared by training, inference and form parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    /// The dataset file could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dataset row could not be deserialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A blood pressure value was not of the form `systolic/diastolic`.
    #[error("malformed blood pressure {0:?}, expected \"systolic/diastolic\"")]
    BloodPressure(String),

    /// A field that must be numeric was not.
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("dataset contains no records")]
    EmptyDataset,

    /// The decision tree could not be fitted.
    #[error("training failed: {0}")]
    Training(#[from] linfa::Error),

    /// The model produced a class id with no diagnosis name.
    #[error("class id {0} has no diagnosis label")]
    UnknownClass(usize),
}

impl DiagnosisError {
    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::InvalidNumber { .. } | Self::BloodPressure(_))
    }
}

pub type Result<T> = std::result::Result<T, DiagnosisError>;
