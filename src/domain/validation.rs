// Form-level validation failures, reported before any backend call
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both latitude and longitude")]
    MissingCoordinates,

    #[error("Please enter at least one location")]
    EmptyBatch,

    #[error("Invalid coordinate format. Use: latitude, longitude")]
    InvalidFormCoordinates,

    /// `line` is 1-based; it is logged but never shown to the user.
    #[error("Invalid coordinate format. Use: latitude, longitude")]
    InvalidCoordinates { line: usize },

    #[error("Please select a CSV file")]
    MissingFile,

    #[error("Please upload a CSV file")]
    NotCsv,
}
