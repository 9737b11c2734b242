//! Polars integration for multi-modal session alignment
//!
//! Each subject arrives as three independently sampled tables: behavioral
//! state labels, video tracking and fiber photometry. This crate joins them
//! into one merged frame per subject and parses merged frames into typed
//! [`Timeline`](photosyl_core::Timeline)s.
//!
//! # Example
//!
//! ```rust
//! use polars::prelude::*;
//! use photosyl_core::{SubjectId, TimelineColumns};
//! use photosyl_polars::{MultiModalAligner, TimelineExt};
//!
//! let state = df![
//!     "BonsaiTrackingTimestamp" => [0.0, 1.0, 2.0],
//!     "syllable_0" => [4i64, 4, 7],
//!     "SecFromInjection" => [-20.0, -19.9, -19.8],
//!     "Genotype" => ["WT", "WT", "WT"]
//! ]?;
//! let tracking = df![
//!     "BonsaiTrackingTimestamp" => [0.0, 1.0, 2.0],
//!     "X" => [0.1, 0.2, 0.3]
//! ]?;
//! let fiber = df![
//!     "BonsaiFlyTimestamp" => [0.1, 0.9, 2.2],
//!     "SecFromInjection" => [-20.0, -19.9, -19.8],
//!     "Genotype" => ["WT", "WT", "WT"],
//!     "Fiber1_ZdFF_scaled" => [0.5, 0.6, 0.7],
//!     "Fiber3_ZdFF_scaled" => [1.5, 1.6, 1.7]
//! ]?;
//!
//! let subject = SubjectId::new("12");
//! let merged = MultiModalAligner::default().align_subject(&subject, &state, &tracking, &fiber)?;
//! assert_eq!(merged.height(), 3);
//!
//! let timeline = merged.to_timeline(&TimelineColumns::default(), subject)?;
//! assert_eq!(timeline.genotype(), "WT");
//! assert_eq!(timeline.initiations(), vec![2]);
//! # Ok::<(), photosyl_polars::Error>(())
//! ```

mod columns;
mod error;
mod methods;
mod registry;
mod traits;

#[cfg(test)]
mod tests;

pub use columns::{select_fiber_columns, select_tracking_columns};
pub use error::{Error, Result};
pub use methods::align::{AlignmentReport, MultiModalAligner};
pub use methods::timeline::{parse_timelines, TimelineBatch};
pub use registry::{parse_subject_id, SubjectRegistry};
pub use traits::TimelineExt;
