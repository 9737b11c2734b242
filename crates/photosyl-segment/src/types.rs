//! Types used for interval detection and segmentation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open span `[start, end)` in index or timestamp units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval<T = usize> {
    /// Start of the span (inclusive)
    pub start: T,
    /// End of the span (exclusive)
    pub end: T,
}

impl<T> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

impl Interval<usize> {
    /// Number of frames in the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Convert to signed index units so offsets may run below zero
    pub fn to_signed(self) -> Interval<i64> {
        Interval::new(self.start as i64, self.end as i64)
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// Present runs of one subject's coordinate series, in both unit systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalDetection {
    /// Frame-index spans
    pub indices: Vec<Interval<usize>>,
    /// The same spans mapped through the timestamp series
    pub timestamps: Vec<Interval<f64>>,
}

impl IntervalDetection {
    /// Frame-index spans in signed units, ready for segment derivation
    pub fn signed_indices(&self) -> Vec<Interval<i64>> {
        self.indices.iter().map(|run| run.to_signed()).collect()
    }
}

/// Coordinate and timestamp series for one subject
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingSeries {
    /// Tracked coordinate per frame, NaN where the animal was not tracked
    pub coordinates: Vec<f64>,
    pub timestamps: Vec<f64>,
}

impl TrackingSeries {
    pub fn new(coordinates: Vec<f64>, timestamps: Vec<f64>) -> Self {
        Self {
            coordinates,
            timestamps,
        }
    }
}

/// Named session window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentName {
    /// Window ending where the second tracked interval starts
    Baseline,
    /// Window starting where the second tracked interval ends
    PostInjection1,
    /// Window starting where the third tracked interval ends
    PostInjection2,
}

impl SegmentName {
    pub const ALL: [SegmentName; 3] = [
        SegmentName::Baseline,
        SegmentName::PostInjection1,
        SegmentName::PostInjection2,
    ];
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentName::Baseline => write!(f, "baseline"),
            SegmentName::PostInjection1 => write!(f, "post-injection-1"),
            SegmentName::PostInjection2 => write!(f, "post-injection-2"),
        }
    }
}

/// The three windows derived from a well-formed session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSet<T> {
    pub baseline: Interval<T>,
    pub post_injection_1: Interval<T>,
    pub post_injection_2: Interval<T>,
}

impl<T: Copy> SegmentSet<T> {
    pub fn get(&self, name: SegmentName) -> Interval<T> {
        match name {
            SegmentName::Baseline => self.baseline,
            SegmentName::PostInjection1 => self.post_injection_1,
            SegmentName::PostInjection2 => self.post_injection_2,
        }
    }

    /// Segments in session order
    pub fn iter(&self) -> impl Iterator<Item = (SegmentName, Interval<T>)> + '_ {
        SegmentName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}
