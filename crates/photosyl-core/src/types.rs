//! Core types shared across the photosyl crates
//!
//! These are the identifiers and per-subject containers that flow from
//! alignment through extraction to ranking and comparison.

use crate::error::{Error, Result};
use crate::labels::initiation_indices;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioral state ("syllable") label code
pub type Syllable = i64;

/// Opaque identifier for one animal in a cohort
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Create a new subject identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Injection phase an event falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InjectionPhase {
    /// Before the pharmacological injection
    Pre,
    /// After the pharmacological injection
    Post,
}

impl fmt::Display for InjectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionPhase::Pre => write!(f, "pre"),
            InjectionPhase::Post => write!(f, "post"),
        }
    }
}

/// Photometry recording channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Dorsal striatum
    DorsalStriatum,
    /// Ventral striatum
    VentralStriatum,
}

impl Channel {
    /// Every channel, in a fixed order
    pub const ALL: [Channel; 2] = [Channel::DorsalStriatum, Channel::VentralStriatum];

    /// Short region name
    pub fn short_name(&self) -> &'static str {
        match self {
            Channel::DorsalStriatum => "DS",
            Channel::VentralStriatum => "VS",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::DorsalStriatum => write!(f, "dorsal-striatum signal"),
            Channel::VentralStriatum => write!(f, "ventral-striatum signal"),
        }
    }
}

/// Composite key identifying one bucket of snippets
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnippetKey {
    pub genotype: String,
    pub phase: InjectionPhase,
    pub label: Syllable,
}

impl SnippetKey {
    pub fn new(genotype: impl Into<String>, phase: InjectionPhase, label: Syllable) -> Self {
        Self {
            genotype: genotype.into(),
            phase,
            label,
        }
    }
}

impl fmt::Display for SnippetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.genotype, self.phase, self.label)
    }
}

/// Typed view of one subject's merged timeline
///
/// Produced by parsing a merged table: labels and injection-relative times
/// are already numeric-or-missing, signals carry NaN where no sample exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    subject: SubjectId,
    genotype: String,
    labels: Vec<Option<Syllable>>,
    injection_time: Vec<Option<f64>>,
    dorsal: Vec<f64>,
    ventral: Vec<f64>,
}

impl Timeline {
    /// Genotype used when the source table has none
    pub const UNKNOWN_GENOTYPE: &'static str = "Unknown";

    /// Create a new timeline, checking that every per-frame column has the same length
    pub fn new(
        subject: SubjectId,
        genotype: impl Into<String>,
        labels: Vec<Option<Syllable>>,
        injection_time: Vec<Option<f64>>,
        dorsal: Vec<f64>,
        ventral: Vec<f64>,
    ) -> Result<Self> {
        let n = labels.len();
        for (len, name) in [
            (injection_time.len(), "injection time"),
            (dorsal.len(), "dorsal channel"),
            (ventral.len(), "ventral channel"),
        ] {
            if len != n {
                return Err(Error::size_mismatch(n, len, name));
            }
        }

        Ok(Self {
            subject,
            genotype: genotype.into(),
            labels,
            injection_time,
            dorsal,
            ventral,
        })
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn genotype(&self) -> &str {
        &self.genotype
    }

    pub fn labels(&self) -> &[Option<Syllable>] {
        &self.labels
    }

    pub fn injection_time(&self) -> &[Option<f64>] {
        &self.injection_time
    }

    /// Signal samples for one channel
    pub fn signal(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::DorsalStriatum => &self.dorsal,
            Channel::VentralStriatum => &self.ventral,
        }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Frame indices where a new state begins
    pub fn initiations(&self) -> Vec<usize> {
        initiation_indices(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_key_ordering() {
        let a = SnippetKey::new("WT", InjectionPhase::Pre, 3);
        let b = SnippetKey::new("WT", InjectionPhase::Post, 1);
        let c = SnippetKey::new("KO", InjectionPhase::Post, 9);
        let mut keys = vec![a.clone(), b.clone(), c.clone()];
        keys.sort();
        assert_eq!(keys, vec![c, a, b]);
    }

    #[test]
    fn test_timeline_rejects_ragged_columns() {
        let result = Timeline::new(
            SubjectId::new("1"),
            "WT",
            vec![Some(1), Some(2)],
            vec![None, None],
            vec![0.0, 0.0],
            vec![0.0],
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_timeline_signal_access() {
        let timeline = Timeline::new(
            SubjectId::from("4"),
            Timeline::UNKNOWN_GENOTYPE,
            vec![Some(1), Some(1), Some(2)],
            vec![Some(0.0); 3],
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        )
        .unwrap();

        assert_eq!(timeline.signal(Channel::DorsalStriatum), &[1.0, 2.0, 3.0]);
        assert_eq!(timeline.signal(Channel::VentralStriatum), &[4.0, 5.0, 6.0]);
        assert_eq!(timeline.initiations(), vec![2]);
        assert_eq!(timeline.subject().to_string(), "4");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(InjectionPhase::Pre.to_string(), "pre");
        assert_eq!(Channel::VentralStriatum.to_string(), "ventral-striatum signal");
        assert_eq!(Channel::DorsalStriatum.short_name(), "DS");
        assert_eq!(
            SnippetKey::new("Het", InjectionPhase::Post, 12).to_string(),
            "Het/post/12"
        );
    }
}
