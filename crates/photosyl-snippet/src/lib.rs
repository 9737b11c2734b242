//! Event-centered snippet extraction
//!
//! Cuts fixed-width windows of each photometry channel around every
//! initiation of a behavioral syllable and files them by genotype, injection
//! phase and label.
//!
//! # Example
//!
//! ```rust
//! use photosyl_core::{ExtractionParameters, InjectionPhase, SnippetKey, SubjectId, Timeline};
//! use photosyl_snippet::SnippetExtractor;
//!
//! let n = 400;
//! let mut labels = vec![Some(1); n];
//! labels[200..].iter_mut().for_each(|l| *l = Some(2));
//! let timeline = Timeline::new(
//!     SubjectId::new("1"),
//!     "WT",
//!     labels,
//!     vec![Some(-10.0); n],
//!     vec![1.0; n],
//!     vec![2.0; n],
//! )
//! .unwrap();
//!
//! let extractor = SnippetExtractor::new(ExtractionParameters::default()).unwrap();
//! let snippets = extractor.extract_subject(&timeline).unwrap();
//! let bucket = snippets.dorsal.get(&SnippetKey::new("WT", InjectionPhase::Pre, 2)).unwrap();
//! assert_eq!(bucket.len(), 1);
//! assert_eq!(bucket.width(), 301);
//! ```

pub mod collection;
pub mod extractor;
pub mod matrix;

pub use collection::{ExtractedSnippets, SnippetCollection};
pub use extractor::SnippetExtractor;
pub use matrix::{SnippetMatrix, SnippetSummary};
