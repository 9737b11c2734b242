//! Tracking-based session segmentation
//!
//! Video tracking drops out while an animal is handled for an injection, so
//! the tracked coordinate of a session splits into three present runs. This
//! crate finds those runs and derives the baseline and post-injection windows
//! from their boundaries.
//!
//! # Usage
//!
//! ```rust
//! use photosyl_segment::{derive_segments, IntervalDetector};
//! use photosyl_core::SegmentationConfig;
//!
//! let mut coords = vec![f64::NAN; 2000];
//! for (s, e) in [(0, 400), (600, 1000), (1200, 1800)] {
//!     coords[s..e].iter_mut().for_each(|x| *x = 1.0);
//! }
//! let timestamps: Vec<f64> = (0..2000).map(|i| i as f64).collect();
//!
//! let detector = IntervalDetector::default();
//! let detection = detector.detect(&coords, &timestamps).unwrap();
//! let segments = derive_segments(&detection.timestamps, &SegmentationConfig::default()).unwrap();
//! assert_eq!(segments.post_injection_1.start, 1000.0);
//! ```

pub mod detector;
pub mod segments;
pub mod types;

pub use detector::{IntervalDetector, SegmentationReport};
pub use segments::{derive_segments, segment_ranges};
pub use types::{Interval, IntervalDetection, SegmentName, SegmentSet, TrackingSeries};
