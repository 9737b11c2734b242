//! Extension trait for reading merged timelines out of Polars DataFrames

use crate::Result;
use photosyl_core::{SubjectId, Timeline, TimelineColumns};
use photosyl_segment::{SegmentName, SegmentSet};
use polars::prelude::*;

/// Typed access to a merged per-subject frame
pub trait TimelineExt {
    /// Column values coerced to floats
    ///
    /// Nulls and values that do not parse as numbers become `None`.
    fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>>;

    /// Parse the frame into a typed [`Timeline`]
    ///
    /// # Arguments
    /// * `columns` - Names of the label, time, genotype and channel columns
    /// * `subject` - Subject the frame belongs to
    ///
    /// # Returns
    /// Timeline with non-integral labels and missing signal samples marked
    /// missing. The genotype is read from the first row and defaults to
    /// [`Timeline::UNKNOWN_GENOTYPE`].
    fn to_timeline(&self, columns: &TimelineColumns, subject: SubjectId) -> Result<Timeline>;

    /// Split a frame sorted by `timestamp_column` into its session segments
    fn slice_segments(
        &self,
        timestamp_column: &str,
        segments: &SegmentSet<f64>,
    ) -> Result<Vec<(SegmentName, DataFrame)>>;
}
