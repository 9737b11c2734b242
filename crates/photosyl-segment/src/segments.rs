//! Segment derivation from detected intervals

use crate::types::{Interval, SegmentName, SegmentSet};
use num_traits::{NumCast, Signed};
use photosyl_core::{utils::search_sorted_left, Error, Result, SegmentationConfig};
use std::ops::Range;

/// Derive the baseline and post-injection windows from three intervals
///
/// For intervals `(a, b), (c, d), (e, f)` the windows are
/// `[c - baseline * unit, c)`, `[d, d + post * unit)` and
/// `[f, f + post * unit)`. Works in timestamp units or signed index units
/// ([`IntervalDetection::signed_indices`](crate::IntervalDetection::signed_indices)),
/// since the baseline may start before the first frame.
pub fn derive_segments<T>(
    intervals: &[Interval<T>],
    config: &SegmentationConfig,
) -> Result<SegmentSet<T>>
where
    T: Signed + NumCast + Copy,
{
    let [_, second, third] = intervals else {
        return Err(Error::UnexpectedIntervalCount {
            found: intervals.len(),
            expected: 3,
        });
    };

    let cast = |minutes: i64| -> Result<T> {
        minutes
            .checked_mul(config.unit)
            .and_then(<T as NumCast>::from)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "offset of {minutes} minutes does not fit the series units"
                ))
            })
    };
    let baseline = cast(config.baseline_minutes)?;
    let post = cast(config.post_injection_minutes)?;

    Ok(SegmentSet {
        baseline: Interval::new(second.start - baseline, second.start),
        post_injection_1: Interval::new(second.end, second.end + post),
        post_injection_2: Interval::new(third.end, third.end + post),
    })
}

/// Map each segment to the row range it covers in a sorted timestamp column
///
/// Both bounds use left insertion, so a row stamped exactly at a segment's
/// end belongs to the next segment.
pub fn segment_ranges(
    sorted_timestamps: &[f64],
    segments: &SegmentSet<f64>,
) -> Vec<(SegmentName, Range<usize>)> {
    segments
        .iter()
        .map(|(name, span)| {
            let start = search_sorted_left(sorted_timestamps, span.start);
            let end = search_sorted_left(sorted_timestamps, span.end).max(start);
            (name, start..end)
        })
        .collect()
}
