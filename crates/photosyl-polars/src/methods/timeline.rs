//! Timeline parsing and segment slicing

use crate::{Result, TimelineExt};
use photosyl_core::labels::parse_label;
use photosyl_core::{Diagnostics, Error as CoreError, SubjectId, Timeline, TimelineColumns};
use photosyl_segment::{segment_ranges, SegmentName, SegmentSet};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

impl TimelineExt for DataFrame {
    fn float_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .column(name)
            .map_err(|_| CoreError::missing_column("frame", name))?;
        let values = column.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }

    fn to_timeline(&self, columns: &TimelineColumns, subject: SubjectId) -> Result<Timeline> {
        let scope = format!("subject {subject}");
        let required = |name: &str| -> Result<Vec<Option<f64>>> {
            if self.get_column_index(name).is_none() {
                return Err(CoreError::missing_column(scope.as_str(), name).into());
            }
            self.float_column(name)
        };

        let labels = required(&columns.label)?.into_iter().map(parse_label).collect();
        let injection_time = required(&columns.injection_time)?
            .into_iter()
            .map(|t| t.filter(|t| !t.is_nan()))
            .collect();
        let signal = |name: &str| -> Result<Vec<f64>> {
            Ok(required(name)?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect())
        };
        let dorsal = signal(&columns.dorsal)?;
        let ventral = signal(&columns.ventral)?;

        let genotype = first_string(self, &columns.genotype)?
            .unwrap_or_else(|| Timeline::UNKNOWN_GENOTYPE.to_string());

        Ok(Timeline::new(
            subject,
            genotype,
            labels,
            injection_time,
            dorsal,
            ventral,
        )?)
    }

    fn slice_segments(
        &self,
        timestamp_column: &str,
        segments: &SegmentSet<f64>,
    ) -> Result<Vec<(SegmentName, DataFrame)>> {
        let timestamps: Vec<f64> = self
            .float_column(timestamp_column)?
            .into_iter()
            .map(|t| t.unwrap_or(f64::NAN))
            .collect();

        Ok(segment_ranges(&timestamps, segments)
            .into_iter()
            .map(|(name, range)| (name, self.slice(range.start as i64, range.len())))
            .collect())
    }
}

/// First value of a column rendered as a string, if the column exists
fn first_string(df: &DataFrame, name: &str) -> Result<Option<String>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    if column.len() == 0 {
        return Ok(None);
    }
    let values = column.cast(&DataType::String)?;
    Ok(values.str()?.get(0).map(str::to_string))
}

/// Typed timelines for every merged subject
#[derive(Debug, Clone, Default)]
pub struct TimelineBatch {
    pub timelines: BTreeMap<SubjectId, Timeline>,
    pub diagnostics: Diagnostics,
}

/// Parse every merged frame, skipping subjects whose required columns are missing
#[instrument(skip_all, fields(subjects = merged.len()))]
pub fn parse_timelines(
    merged: &BTreeMap<SubjectId, DataFrame>,
    columns: &TimelineColumns,
) -> TimelineBatch {
    let mut batch = TimelineBatch::default();

    for (subject, df) in merged {
        match df.to_timeline(columns, subject.clone()) {
            Ok(timeline) => {
                debug!(%subject, frames = timeline.len(), genotype = timeline.genotype(), "parsed timeline");
                batch.timelines.insert(subject.clone(), timeline);
            }
            Err(e) => batch.diagnostics.push(e.diagnostic(format!("subject {subject}"))),
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use photosyl_core::Channel;
    use photosyl_segment::Interval;

    fn merged() -> DataFrame {
        df![
            "syllable_0" => [Some(1.0), Some(1.0), None, Some(2.5), Some(3.0)],
            "SecFromInjection_fiber" => [Some(-20.0), None, Some(-10.0), Some(15.0), Some(20.0)],
            "Genotype_syllable" => ["KO", "KO", "KO", "KO", "KO"],
            "DS_470" => [Some(0.1), Some(0.2), None, Some(0.4), Some(0.5)],
            "VS_470" => [1.0, 2.0, 3.0, 4.0, 5.0]
        ]
        .unwrap()
    }

    #[test]
    fn test_to_timeline() {
        let timeline = merged()
            .to_timeline(&TimelineColumns::default(), SubjectId::new("4"))
            .unwrap();

        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline.genotype(), "KO");
        assert_eq!(timeline.labels(), &[Some(1), Some(1), None, None, Some(3)]);
        assert_eq!(timeline.injection_time()[1], None);
        assert!(timeline.signal(Channel::DorsalStriatum)[2].is_nan());
        assert_eq!(timeline.signal(Channel::VentralStriatum)[4], 5.0);
    }

    #[test]
    fn test_string_labels_become_missing() {
        let df = df![
            "syllable_0" => ["3", "x", "4"],
            "SecFromInjection_fiber" => [0.0, 0.0, 0.0],
            "DS_470" => [0.0, 0.0, 0.0],
            "VS_470" => [0.0, 0.0, 0.0]
        ]
        .unwrap();
        let timeline = df
            .to_timeline(&TimelineColumns::default(), SubjectId::new("1"))
            .unwrap();
        assert_eq!(timeline.labels(), &[Some(3), None, Some(4)]);
        assert_eq!(timeline.genotype(), Timeline::UNKNOWN_GENOTYPE);
    }

    #[test]
    fn test_missing_label_column() {
        let df = merged().drop("syllable_0").unwrap();
        let result = df.to_timeline(&TimelineColumns::default(), SubjectId::new("9"));
        match result {
            Err(crate::Error::Core(CoreError::MissingColumn { scope, column })) => {
                assert_eq!(scope, "subject 9");
                assert_eq!(column, "syllable_0");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_slice_segments() {
        let df = df![
            "timestamp_state" => (0..20).map(|i| i as f64).collect::<Vec<_>>(),
            "x" => (0..20).collect::<Vec<i32>>()
        ]
        .unwrap();
        let segments = SegmentSet {
            baseline: Interval::new(-5.0, 3.0),
            post_injection_1: Interval::new(5.0, 10.0),
            post_injection_2: Interval::new(18.0, 40.0),
        };
        let parts = df.slice_segments("timestamp_state", &segments).unwrap();
        let heights: Vec<usize> = parts.iter().map(|(_, p)| p.height()).collect();
        assert_eq!(heights, vec![3, 5, 2]);
        assert_eq!(parts[1].0, SegmentName::PostInjection1);
    }

    #[test]
    fn test_batch_skips_broken_subject() {
        let mut frames = BTreeMap::new();
        frames.insert(SubjectId::new("1"), merged());
        frames.insert(SubjectId::new("2"), merged().drop("DS_470").unwrap());

        let batch = parse_timelines(&frames, &TimelineColumns::default());
        assert_eq!(batch.timelines.len(), 1);
        assert_eq!(batch.diagnostics.for_scope("subject 2").count(), 1);
    }
}
