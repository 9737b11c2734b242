//! Alignment, segmentation and comparison of fiber photometry with behavior
//!
//! This crate re-exports the photosyl workspace:
//!
//! - [`core`]: shared types, configuration, errors and diagnostics
//! - [`segment`]: tracking-gap detection and session segments
//! - [`polars`]: multi-modal table alignment and timeline parsing
//! - [`snippet`]: event-centered snippet extraction
//! - [`rank`]: cohort syllable ranking
//! - [`distance`]: signal distance matrices, Spearman and Mantel comparison
//!
//! A typical run aligns each subject's tables, parses the merged frames into
//! timelines, extracts snippets, ranks syllables and compares the signal
//! distance structure of the top-ranked syllables against behavior.

pub use photosyl_core as core;
pub use photosyl_distance as distance;
pub use photosyl_polars as polars;
pub use photosyl_rank as rank;
pub use photosyl_segment as segment;
pub use photosyl_snippet as snippet;

/// Commonly used types from every stage
pub mod prelude {
    pub use photosyl_core::{
        Availability, Channel, ComparisonConfig, Diagnostics, Error, ExtractionParameters,
        InjectionPhase, PipelineConfig, Result, SnippetKey, SubjectId, Syllable, Timeline,
    };
    pub use photosyl_distance::{BehaviorDistances, DistanceComparator, DistanceMatrix, MantelTest};
    pub use photosyl_polars::{
        parse_timelines, MultiModalAligner, SubjectRegistry, TimelineExt,
    };
    pub use photosyl_rank::{SyllableRanker, SyllableRanking};
    pub use photosyl_segment::{derive_segments, IntervalDetector, SegmentName};
    pub use photosyl_snippet::{ExtractedSnippets, SnippetExtractor};
}
