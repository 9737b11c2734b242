//! Error types for photosyl
//!
//! Provides the shared error type used by every photosyl crate. Crate-local
//! error enums wrap this one with `#[from]`.

use thiserror::Error;

/// Core error type for alignment, segmentation and comparison operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A required column is absent from an input table
    #[error("Missing column '{column}' for {scope}")]
    MissingColumn { scope: String, column: String },

    /// Interval detection found a count other than the expected one
    #[error("Found {found} qualifying intervals, expected {expected}")]
    UnexpectedIntervalCount { found: usize, expected: usize },

    /// Two distance structures share too few labels to be compared
    #[error("Only {found} common labels with {origin}, need at least {required}")]
    InsufficientCommonLabels {
        origin: String,
        found: usize,
        required: usize,
    },

    /// Two input groups resolve to the same subject identifier
    #[error("Duplicate subject identifier: {0}")]
    DuplicateSubject(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Configuration could not be (de)serialized
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a column missing from a subject's table
    pub fn missing_column(scope: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            scope: scope.into(),
            column: column.into(),
        }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Batch-level identity violations halt the batch; everything else is
    /// confined to the unit that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateSubject(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_column("subject 12", "BonsaiFlyTimestamp");
        assert_eq!(
            err.to_string(),
            "Missing column 'BonsaiFlyTimestamp' for subject 12"
        );

        let err = Error::UnexpectedIntervalCount { found: 2, expected: 3 };
        assert_eq!(err.to_string(), "Found 2 qualifying intervals, expected 3");

        let err = Error::InsufficientCommonLabels {
            origin: "moseq.p".to_string(),
            found: 1,
            required: 2,
        };
        assert_eq!(
            err.to_string(),
            "Only 1 common labels with moseq.p, need at least 2"
        );

        let err = Error::DuplicateSubject("7".to_string());
        assert_eq!(err.to_string(), "Duplicate subject identifier: 7");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(100, 50, "dorsal channel");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in dorsal channel: expected 100, got 50"
        );

        let err = Error::non_finite("timestamps");
        assert_eq!(
            err.to_string(),
            "Computation error: timestamps contains NaN or infinite values"
        );
    }

    #[test]
    fn test_only_duplicate_subject_is_fatal() {
        assert!(Error::DuplicateSubject("1".into()).is_fatal());
        assert!(!Error::missing_column("s", "c").is_fatal());
        assert!(!Error::UnexpectedIntervalCount { found: 0, expected: 3 }.is_fatal());
        assert!(!Error::Computation("x".into()).is_fatal());
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
