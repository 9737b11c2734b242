//! Column selection for raw tracking and fiber tables

use crate::Result;
use polars::prelude::*;

/// Keep the timestamp column and the three positional columns of a tracking table
///
/// Selects the first column and the last three, without repeats.
pub fn select_tracking_columns(df: &DataFrame) -> Result<DataFrame> {
    let names = column_names(df);
    let tail_start = names.len().saturating_sub(3);

    let mut keep: Vec<String> = names.iter().take(1).cloned().collect();
    for name in &names[tail_start..] {
        if !keep.contains(name) {
            keep.push(name.clone());
        }
    }

    Ok(df.select(keep)?)
}

/// Drop the raw per-fiber columns of a photometry table
///
/// Keeps every column whose name does not start with "fiber" (any case),
/// followed by the last two columns, which carry the processed channels.
pub fn select_fiber_columns(df: &DataFrame) -> Result<DataFrame> {
    let names = column_names(df);
    let tail_start = names.len().saturating_sub(2);

    let mut keep: Vec<String> = names
        .iter()
        .filter(|name| !name.to_lowercase().starts_with("fiber"))
        .cloned()
        .collect();
    for name in &names[tail_start..] {
        if !keep.contains(name) {
            keep.push(name.clone());
        }
    }

    Ok(df.select(keep)?)
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
