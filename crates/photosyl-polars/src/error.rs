//! Error types for photosyl-polars

use photosyl_core::{Diagnostic, DiagnosticKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("{0}")]
    Core(#[from] photosyl_core::Error),

    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    #[error("Merge key '{column}' contains {count} null values")]
    NullKeys { column: String, count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Describe this failure as the reason `scope` was skipped
    pub fn diagnostic(&self, scope: impl Into<String>) -> Diagnostic {
        match self {
            Error::Core(e) => Diagnostic::from_error(scope, e),
            Error::TypeMismatch { .. } => Diagnostic::new(scope, DiagnosticKind::Schema, self.to_string()),
            Error::NullKeys { .. } | Error::Polars(_) => {
                Diagnostic::new(scope, DiagnosticKind::Anomaly, self.to_string())
            }
        }
    }

    /// Batch-level identity violations halt the batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_fatal())
    }
}
