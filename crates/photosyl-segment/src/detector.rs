//! Detection of contiguous tracked intervals
//!
//! A tracked coordinate is NaN while the animal is out of the arena (for
//! example during handling and injection). A well-formed session has three
//! long present runs; the gaps between them mark the injections.

use crate::segments::derive_segments;
use crate::types::{Interval, IntervalDetection, SegmentSet, TrackingSeries};
use photosyl_core::{Diagnostics, Error, Result, SegmentationConfig, SubjectId};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Result of running detection over many subjects
#[derive(Debug, Clone, Default)]
pub struct SegmentationReport {
    /// Intervals of every subject with the expected count
    pub intervals: BTreeMap<SubjectId, IntervalDetection>,
    /// Segments in timestamp units for the same subjects
    pub segments: BTreeMap<SubjectId, SegmentSet<f64>>,
    /// Subjects that were skipped and why
    pub diagnostics: Diagnostics,
}

/// Finds present runs of a coordinate series
#[derive(Debug, Clone, Default)]
pub struct IntervalDetector {
    config: SegmentationConfig,
}

impl IntervalDetector {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// All present runs strictly longer than the minimum duration, in order
    pub fn find_present_runs(&self, coordinates: &[f64]) -> Vec<Interval<usize>> {
        let mut runs = Vec::new();
        let mut start = None;

        for (i, x) in coordinates.iter().enumerate() {
            match (x.is_nan(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    runs.push(Interval::new(s, i));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Interval::new(s, coordinates.len()));
        }

        runs.retain(|run| run.len() > self.config.min_duration);
        runs
    }

    /// Detect the expected number of present runs and map them to timestamps
    ///
    /// A run that reaches the end of the series maps its end to the last
    /// timestamp.
    pub fn detect(&self, coordinates: &[f64], timestamps: &[f64]) -> Result<IntervalDetection> {
        if coordinates.len() != timestamps.len() {
            return Err(Error::size_mismatch(
                coordinates.len(),
                timestamps.len(),
                "tracking timestamps",
            ));
        }

        let indices = self.find_present_runs(coordinates);
        if indices.len() != self.config.expected_intervals {
            return Err(Error::UnexpectedIntervalCount {
                found: indices.len(),
                expected: self.config.expected_intervals,
            });
        }

        let last = timestamps.len().saturating_sub(1);
        let timestamps = indices
            .iter()
            .map(|run| Interval::new(timestamps[run.start], timestamps[run.end.min(last)]))
            .collect();

        Ok(IntervalDetection { indices, timestamps })
    }

    /// Detect intervals and derive timestamp segments for every subject
    ///
    /// Subjects with the wrong interval count are skipped with a diagnostic.
    /// Every successful detection is kept in `intervals`; segments are only
    /// derived from exactly three intervals, so any other expected count
    /// leaves `segments` empty and records why.
    #[instrument(skip(self, subjects), fields(subjects = subjects.len()))]
    pub fn detect_batch(&self, subjects: &BTreeMap<SubjectId, TrackingSeries>) -> SegmentationReport {
        let mut report = SegmentationReport::default();

        for (subject, series) in subjects {
            let scope = format!("subject {subject}");
            let detection = match self.detect(&series.coordinates, &series.timestamps) {
                Ok(d) => d,
                Err(e) => {
                    report.diagnostics.record_error(scope, &e);
                    continue;
                }
            };

            let derived = derive_segments(&detection.timestamps, &self.config);
            report.intervals.insert(subject.clone(), detection);
            match derived {
                Ok(segments) => {
                    debug!(%subject, baseline = %segments.baseline, "segmented session");
                    report.segments.insert(subject.clone(), segments);
                }
                Err(e) => report.diagnostics.record_error(scope, &e),
            }
        }

        report
    }
}
