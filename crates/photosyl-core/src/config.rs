//! Configuration types for every pipeline stage
//!
//! Each stage takes its parameters by value. Defaults reproduce the
//! recording setup the pipeline was built for (60 fps tracking, two striatal
//! fibers, injection windows in minutes).

use crate::error::{Error, Result};
use crate::types::{InjectionPhase, Syllable};
use serde::{Deserialize, Serialize};

/// Parameters for tracking-interval detection and segment derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Runs must be strictly longer than this many frames
    pub min_duration: usize,
    /// Number of present runs a well-formed session contains
    pub expected_intervals: usize,
    /// Series units per minute
    pub unit: i64,
    /// Baseline length before the second interval starts, in minutes
    pub baseline_minutes: i64,
    /// Length of each post-injection segment, in minutes
    pub post_injection_minutes: i64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_duration: 4 * 60,
            expected_intervals: 3,
            unit: 60,
            baseline_minutes: 15,
            post_injection_minutes: 30,
        }
    }
}

/// Column names used when aligning the three per-subject tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSchema {
    /// Reference timestamp on the state-label / tracking side
    pub state_timestamp: String,
    /// Reference timestamp on the fiber side
    pub signal_timestamp: String,
    pub canonical_state_timestamp: String,
    pub canonical_signal_timestamp: String,
    /// Noise columns dropped from the merged table when present
    pub drop_columns: Vec<String>,
    /// Raw channel column -> canonical channel column
    pub channel_renames: Vec<(String, String)>,
    /// Suffix for overlapping column names from the state/tracking side
    pub state_suffix: String,
    /// Suffix for overlapping column names from the fiber side
    pub signal_suffix: String,
}

impl Default for AlignmentSchema {
    fn default() -> Self {
        Self {
            state_timestamp: "BonsaiTrackingTimestamp".to_string(),
            signal_timestamp: "BonsaiFlyTimestamp".to_string(),
            canonical_state_timestamp: "timestamp_state".to_string(),
            canonical_signal_timestamp: "timestamp_signal".to_string(),
            drop_columns: vec![
                "MetaFlyTimestamp".to_string(),
                "ExtraVar1".to_string(),
                "FrameNo".to_string(),
            ],
            channel_renames: vec![
                ("Fiber1_ZdFF_scaled".to_string(), "VS_470".to_string()),
                ("Fiber3_ZdFF_scaled".to_string(), "DS_470".to_string()),
            ],
            state_suffix: "_syllable".to_string(),
            signal_suffix: "_fiber".to_string(),
        }
    }
}

/// Column names read from a merged table when building a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineColumns {
    pub label: String,
    pub injection_time: String,
    pub genotype: String,
    pub dorsal: String,
    pub ventral: String,
}

impl Default for TimelineColumns {
    fn default() -> Self {
        Self {
            label: "syllable_0".to_string(),
            injection_time: "SecFromInjection_fiber".to_string(),
            genotype: "Genotype_syllable".to_string(),
            dorsal: "DS_470".to_string(),
            ventral: "VS_470".to_string(),
        }
    }
}

/// Inclusive injection-relative time windows, in the injection column's units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseWindows {
    pub pre: (f64, f64),
    pub post: (f64, f64),
}

impl Default for PhaseWindows {
    fn default() -> Self {
        Self {
            pre: (-25.0, -5.0),
            post: (10.0, 40.0),
        }
    }
}

impl PhaseWindows {
    /// Phase an event at `time` belongs to, if any
    pub fn classify(&self, time: f64) -> Option<InjectionPhase> {
        if self.pre.0 <= time && time <= self.pre.1 {
            Some(InjectionPhase::Pre)
        } else if self.post.0 <= time && time <= self.post.1 {
            Some(InjectionPhase::Post)
        } else {
            None
        }
    }
}

/// Snippet extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionParameters {
    /// Frames before the event
    pub m: usize,
    /// Frames after the event
    pub n: usize,
    /// Index within the window whose smoothed value is subtracted
    pub normalization_frame: usize,
    /// Width of the centered rolling mean
    pub smoothing_window: usize,
    /// Buckets smaller than this are ignored by consumers
    pub min_snippets_required: usize,
    /// Labels `0..label_count` are extracted
    pub label_count: Syllable,
    pub phases: PhaseWindows,
}

impl Default for ExtractionParameters {
    fn default() -> Self {
        Self {
            m: 150,
            n: 150,
            normalization_frame: 0,
            smoothing_window: 15,
            min_snippets_required: 10,
            label_count: 40,
            phases: PhaseWindows::default(),
        }
    }
}

impl ExtractionParameters {
    /// Set the window extent around each event
    pub fn with_window(mut self, m: usize, n: usize) -> Self {
        self.m = m;
        self.n = n;
        self
    }

    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    pub fn with_normalization_frame(mut self, frame: usize) -> Self {
        self.normalization_frame = frame;
        self
    }

    pub fn with_min_snippets(mut self, min: usize) -> Self {
        self.min_snippets_required = min;
        self
    }

    /// Largest accepted `m` or `n`, one hour of frames at 60 fps
    pub const MAX_HALF_WINDOW: usize = 60 * 60 * 60;

    /// Length of every extracted snippet
    pub fn snippet_len(&self) -> usize {
        self.m.saturating_add(self.n).saturating_add(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.m > Self::MAX_HALF_WINDOW || self.n > Self::MAX_HALF_WINDOW {
            return Err(Error::InvalidParameter(format!(
                "window extent ({}, {}) exceeds {} frames",
                self.m,
                self.n,
                Self::MAX_HALF_WINDOW
            )));
        }
        if self.smoothing_window == 0 {
            return Err(Error::InvalidParameter(
                "smoothing_window must be positive".to_string(),
            ));
        }
        if self.normalization_frame >= self.snippet_len() {
            return Err(Error::InvalidParameter(format!(
                "normalization_frame {} outside snippet of length {}",
                self.normalization_frame,
                self.snippet_len()
            )));
        }
        if self.label_count <= 0 {
            return Err(Error::InvalidParameter(
                "label_count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Distance-matrix comparison parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Buckets smaller than this do not contribute to a label's signature
    pub min_snippets: usize,
    /// Restrict signatures and comparisons to these labels
    pub allowed_labels: Option<Vec<Syllable>>,
    pub min_common_labels: usize,
    pub permutations: usize,
    pub seed: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            min_snippets: 10,
            allowed_labels: None,
            min_common_labels: 2,
            permutations: 999,
            seed: 0x5EED,
        }
    }
}

/// Every stage's configuration in one place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub segmentation: SegmentationConfig,
    pub alignment: AlignmentSchema,
    pub columns: TimelineColumns,
    pub extraction: ExtractionParameters,
    pub comparison: ComparisonConfig,
}

impl PipelineConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.extraction.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_windows_are_inclusive_and_exclusive_of_each_other() {
        let w = PhaseWindows::default();
        assert_eq!(w.classify(-25.0), Some(InjectionPhase::Pre));
        assert_eq!(w.classify(-5.0), Some(InjectionPhase::Pre));
        assert_eq!(w.classify(0.0), None);
        assert_eq!(w.classify(10.0), Some(InjectionPhase::Post));
        assert_eq!(w.classify(40.0), Some(InjectionPhase::Post));
        assert_eq!(w.classify(40.5), None);
        assert_eq!(w.classify(f64::NAN), None);
    }

    #[test]
    fn test_extraction_defaults() {
        let p = ExtractionParameters::default();
        assert_eq!((p.m, p.n), (150, 150));
        assert_eq!(p.snippet_len(), 301);
        assert_eq!(p.smoothing_window, 15);
        assert_eq!(p.min_snippets_required, 10);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_extraction_validation() {
        let p = ExtractionParameters::default().with_smoothing_window(0);
        assert!(matches!(p.validate(), Err(Error::InvalidParameter(_))));

        let p = ExtractionParameters::default()
            .with_window(2, 2)
            .with_normalization_frame(5);
        assert!(p.validate().is_err());

        let p = p.with_normalization_frame(4);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let p = ExtractionParameters::default().with_window(usize::MAX, usize::MAX);
        assert!(matches!(p.validate(), Err(Error::InvalidParameter(_))));

        let limit = ExtractionParameters::MAX_HALF_WINDOW;
        assert!(ExtractionParameters::default().with_window(limit, limit).validate().is_ok());
        assert!(ExtractionParameters::default()
            .with_window(0, limit + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "extraction": { "m": 30, "n": 60 }, "comparison": { "permutations": 99 } }"#,
        )
        .unwrap();
        assert_eq!(config.extraction.m, 30);
        assert_eq!(config.extraction.n, 60);
        assert_eq!(config.extraction.smoothing_window, 15);
        assert_eq!(config.comparison.permutations, 99);
        assert_eq!(config.segmentation.min_duration, 240);
        assert_eq!(config.alignment.state_timestamp, "BonsaiTrackingTimestamp");
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_config() {
        let result = PipelineConfig::from_json_str(r#"{ "extraction": { "smoothing_window": 0 } }"#);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert!(matches!(PipelineConfig::from_json_str("{"), Err(Error::Config(_))));
    }
}
