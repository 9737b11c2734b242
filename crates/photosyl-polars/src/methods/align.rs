//! Multi-modal alignment of state-label, tracking and fiber tables
//!
//! State labels and tracking share the behavior-camera clock and are joined
//! positionally. Photometry runs on its own clock, so each behavior frame is
//! matched to the fiber sample whose timestamp is nearest.

use crate::columns::column_names;
use crate::{Error, Result};
use photosyl_core::utils::stable_argsort;
use photosyl_core::{AlignmentSchema, Diagnostic, DiagnosticKind, Diagnostics, SubjectId};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Merged tables of every subject that aligned cleanly
#[derive(Debug, Clone, Default)]
pub struct AlignmentReport {
    pub merged: BTreeMap<SubjectId, DataFrame>,
    /// Subjects that were skipped and why
    pub diagnostics: Diagnostics,
}

/// Aligns the three per-subject tables into one timeline
#[derive(Debug, Clone, Default)]
pub struct MultiModalAligner {
    schema: AlignmentSchema,
}

impl MultiModalAligner {
    pub fn new(schema: AlignmentSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &AlignmentSchema {
        &self.schema
    }

    /// Align one subject's tables
    ///
    /// The result has one row per behavior frame (the shorter of the state
    /// and tracking tables), ordered by the state timestamp, with the nearest
    /// fiber sample attached.
    pub fn align_subject(
        &self,
        subject: &SubjectId,
        state: &DataFrame,
        tracking: &DataFrame,
        fiber: &DataFrame,
    ) -> Result<DataFrame> {
        let scope = format!("subject {subject}");
        let combined = self.combine_behavior(subject, state, tracking)?;

        let state_ts = timestamp_values(&combined, &self.schema.state_timestamp, &scope)?;
        let signal_ts = timestamp_values(fiber, &self.schema.signal_timestamp, &scope)?;

        let combined = take_rows(&combined, &stable_argsort(&state_ts))?;
        let fiber_order = stable_argsort(&signal_ts);
        let fiber = take_rows(fiber, &fiber_order)?;
        let sorted_signal: Vec<f64> = fiber_order.iter().map(|&i| signal_ts[i]).collect();
        let sorted_state = timestamp_values(&combined, &self.schema.state_timestamp, &scope)?;

        let matched = if sorted_signal.is_empty() {
            null_rows(&fiber, combined.height())?
        } else {
            let idx = nearest_indices(&sorted_state, &sorted_signal);
            take_rows(&fiber, &idx)?
        };

        let merged = self.join_with_suffixes(combined, matched)?;
        let merged = self.canonicalize(merged)?;

        debug!(%subject, rows = merged.height(), columns = merged.width(), "aligned subject");
        Ok(merged)
    }

    /// Align every subject that has all three tables
    ///
    /// Subjects missing a counterpart table, or whose merge fails, are skipped
    /// with a diagnostic.
    #[instrument(skip_all, fields(subjects = state.len()))]
    pub fn align_all(
        &self,
        state: &BTreeMap<SubjectId, DataFrame>,
        tracking: &BTreeMap<SubjectId, DataFrame>,
        fiber: &BTreeMap<SubjectId, DataFrame>,
    ) -> AlignmentReport {
        let mut report = AlignmentReport::default();

        for (subject, state_df) in state {
            let scope = format!("subject {subject}");
            let (Some(tracking_df), Some(fiber_df)) = (tracking.get(subject), fiber.get(subject))
            else {
                let missing = if tracking.contains_key(subject) { "fiber" } else { "tracking" };
                report.diagnostics.push(Diagnostic::new(
                    scope,
                    DiagnosticKind::MissingInput,
                    format!("no {missing} table"),
                ));
                continue;
            };

            match self.align_subject(subject, state_df, tracking_df, fiber_df) {
                Ok(merged) => {
                    report.merged.insert(subject.clone(), merged);
                }
                Err(e) => report.diagnostics.push(e.diagnostic(scope)),
            }
        }

        report
    }

    /// Truncate to the shorter table and concatenate column-wise
    ///
    /// Both tables must carry the behavior timestamp themselves.
    fn combine_behavior(
        &self,
        subject: &SubjectId,
        state: &DataFrame,
        tracking: &DataFrame,
    ) -> Result<DataFrame> {
        let key = &self.schema.state_timestamp;
        for df in [state, tracking] {
            if df.get_column_index(key).is_none() {
                let scope = format!("subject {subject}");
                return Err(photosyl_core::Error::missing_column(scope, key).into());
            }
        }

        let rows = state.height().min(tracking.height());
        let state = state.slice(0, rows);
        let tracking = tracking.slice(0, rows);

        let mut columns: Vec<Column> = state.get_columns().to_vec();
        for column in tracking.get_columns() {
            if state.get_column_index(column.name()).is_some() {
                debug!(%subject, column = %column.name(), "tracking column shadowed by state table");
                continue;
            }
            columns.push(column.clone());
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Place matched fiber columns beside the behavior columns
    fn join_with_suffixes(&self, left: DataFrame, right: DataFrame) -> Result<DataFrame> {
        let left_names = column_names(&left);
        let right_names = column_names(&right);

        let rename = |column: &Column, other: &[String], suffix: &str| {
            let mut column = column.clone();
            let name = column.name().to_string();
            if other.contains(&name) {
                column.rename(format!("{name}{suffix}").into());
            }
            column
        };

        let mut columns: Vec<Column> = left
            .get_columns()
            .iter()
            .map(|c| rename(c, &right_names, &self.schema.state_suffix))
            .collect();
        columns.extend(
            right
                .get_columns()
                .iter()
                .map(|c| rename(c, &left_names, &self.schema.signal_suffix)),
        );

        Ok(DataFrame::new(columns)?)
    }

    /// Canonical timestamp and channel names, noise columns removed
    fn canonicalize(&self, mut df: DataFrame) -> Result<DataFrame> {
        for column in &self.schema.drop_columns {
            if df.get_column_index(column).is_some() {
                df = df.drop(column)?;
            }
        }

        let renames = [
            (&self.schema.state_timestamp, &self.schema.canonical_state_timestamp),
            (&self.schema.signal_timestamp, &self.schema.canonical_signal_timestamp),
        ]
        .into_iter()
        .chain(self.schema.channel_renames.iter().map(|(from, to)| (from, to)));

        for (from, to) in renames {
            if df.get_column_index(from).is_some() {
                df.rename(from, to.as_str().into())?;
            }
        }

        Ok(df)
    }
}

/// Timestamp column as floats; nulls are an error
fn timestamp_values(df: &DataFrame, column: &str, scope: &str) -> Result<Vec<f64>> {
    let series = df
        .column(column)
        .map_err(|_| photosyl_core::Error::missing_column(scope, column))?;
    let values = series.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let nulls = values.null_count();
    if nulls > 0 {
        return Err(Error::NullKeys {
            column: column.to_string(),
            count: nulls,
        });
    }

    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Index of the nearest value in `sorted` for every value of `targets`
///
/// Equidistant candidates resolve to the earlier one.
pub(crate) fn nearest_indices(targets: &[f64], sorted: &[f64]) -> Vec<usize> {
    targets
        .iter()
        .map(|&t| {
            let after = sorted.partition_point(|&x| x < t);
            let before = sorted.partition_point(|&x| x <= t).checked_sub(1);
            match (before, sorted.get(after)) {
                (Some(b), Some(&a)) if a - t < t - sorted[b] => after,
                (Some(b), _) => b,
                (None, _) => after.min(sorted.len() - 1),
            }
        })
        .collect()
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

/// All-null rows with the schema of `df`
fn null_rows(df: &DataFrame, height: usize) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|c| Column::full_null(c.name().clone(), height, c.dtype()))
        .collect();
    Ok(DataFrame::new(columns)?)
}
