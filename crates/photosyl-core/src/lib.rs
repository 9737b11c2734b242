//! Core types and configuration for photosyl
//!
//! This crate holds everything the pipeline stages share:
//!
//! 1. **Types** - subject identifiers, injection phases, channels, snippet keys
//!    and the typed per-subject [`Timeline`]
//! 2. **Configuration** - one parameter struct per stage, grouped in
//!    [`PipelineConfig`]
//! 3. **Errors and diagnostics** - the shared [`Error`] enum and the
//!    [`Diagnostics`] collected when a batch skips a unit
//!
//! # Example
//!
//! ```rust
//! use photosyl_core::{labels::initiation_indices, ExtractionParameters};
//!
//! let labels = vec![Some(3), Some(3), Some(8), None, Some(8)];
//! assert_eq!(initiation_indices(&labels), vec![2, 4]);
//!
//! let params = ExtractionParameters::default().with_window(30, 60);
//! assert_eq!(params.snippet_len(), 91);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod labels;
pub mod types;
pub mod utils;

pub use config::{
    AlignmentSchema, ComparisonConfig, ExtractionParameters, PhaseWindows, PipelineConfig,
    SegmentationConfig, TimelineColumns,
};
pub use diagnostics::{Availability, Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Error, Result};
pub use types::{Channel, InjectionPhase, SnippetKey, SubjectId, Syllable, Timeline};
