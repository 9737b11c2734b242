//! Recoverable per-unit failures collected during batch processing
//!
//! Batch operations skip the subject, label or source that failed and keep
//! going. Each skip is logged through `tracing` and recorded as a
//! [`Diagnostic`] so callers can inspect what was dropped and why.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Category of a recoverable failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A required column was absent
    Schema,
    /// Input was well-formed but did not fit the expected pattern
    Anomaly,
    /// A statistic could not be computed on degenerate input
    NumericDegeneracy,
    /// A subject had no counterpart table
    MissingInput,
}

impl From<&Error> for DiagnosticKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::MissingColumn { .. } => DiagnosticKind::Schema,
            Error::UnexpectedIntervalCount { .. }
            | Error::InsufficientCommonLabels { .. }
            | Error::InsufficientData { .. } => DiagnosticKind::Anomaly,
            Error::Computation(_) => DiagnosticKind::NumericDegeneracy,
            _ => DiagnosticKind::Anomaly,
        }
    }
}

/// One recoverable failure attributed to a subject, label or source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What was skipped, e.g. "subject 12" or "behavior source moseq.p"
    pub scope: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(scope: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            kind,
            message: message.into(),
        }
    }

    /// Build a diagnostic from the error that caused a unit to be skipped
    pub fn from_error(scope: impl Into<String>, err: &Error) -> Self {
        Self::new(scope, DiagnosticKind::from(err), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.kind, self.scope, self.message)
    }
}

/// Ordered collection of diagnostics from one batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(scope = %diagnostic.scope, kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record the error that caused `scope` to be skipped
    pub fn record_error(&mut self, scope: impl Into<String>, err: &Error) {
        self.push(Diagnostic::from_error(scope, err));
    }

    /// Append diagnostics gathered elsewhere without logging them again
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics recorded for one scope
    pub fn for_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.scope == scope)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A statistic that may be unavailable on degenerate input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Availability<T> {
    Computed(T),
    Unavailable { reason: String },
}

impl<T> Availability<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            Self::Computed(v) => Some(v),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Computed(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl<T> From<crate::Result<T>> for Availability<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(v) => Self::Computed(v),
            Err(e) => Self::unavailable(e.to_string()),
        }
    }
}
