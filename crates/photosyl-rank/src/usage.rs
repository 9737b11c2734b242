//! Per-subject syllable usage

use photosyl_core::labels::initiation_indices;
use photosyl_core::Syllable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Initiation and frame counts of every label one subject used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableUsage {
    pub initiations: BTreeMap<Syllable, usize>,
    pub frames: BTreeMap<Syllable, usize>,
}

impl SyllableUsage {
    /// Count usage from a label column; missing labels are not counted
    pub fn from_labels(labels: &[Option<Syllable>]) -> Self {
        let mut usage = Self::default();
        for label in labels.iter().flatten() {
            *usage.frames.entry(*label).or_default() += 1;
        }
        for i in initiation_indices(labels) {
            if let Some(label) = labels[i] {
                *usage.initiations.entry(label).or_default() += 1;
            }
        }
        usage
    }

    /// Share of this subject's initiations that started `label`
    pub fn initiation_proportion(&self, label: Syllable) -> f64 {
        proportion(&self.initiations, label)
    }

    /// Share of this subject's labeled frames spent in `label`
    pub fn occupancy_proportion(&self, label: Syllable) -> f64 {
        proportion(&self.frames, label)
    }

    /// Every label seen in any frame
    pub fn labels(&self) -> impl Iterator<Item = Syllable> + '_ {
        self.frames.keys().copied()
    }
}

fn proportion(counts: &BTreeMap<Syllable, usize>, label: Syllable) -> f64 {
    let total: usize = counts.values().sum();
    match counts.get(&label) {
        Some(&count) if total > 0 => count as f64 / total as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts_skip_missing_labels() {
        let labels = [Some(1), Some(1), None, Some(2), Some(2), Some(1)];
        let usage = SyllableUsage::from_labels(&labels);

        assert_eq!(usage.frames[&1], 3);
        assert_eq!(usage.frames[&2], 2);
        // Frame 0 never counts; after the gap label 2 starts, then label 1
        assert_eq!(usage.initiations.get(&1), Some(&1));
        assert_eq!(usage.initiations.get(&2), Some(&1));

        assert_relative_eq!(usage.occupancy_proportion(1), 0.6);
        assert_relative_eq!(usage.initiation_proportion(2), 0.5);
        assert_eq!(usage.initiation_proportion(9), 0.0);
    }

    #[test]
    fn test_empty_labels() {
        let usage = SyllableUsage::from_labels(&[None, None]);
        assert!(usage.frames.is_empty());
        assert_eq!(usage.occupancy_proportion(0), 0.0);
    }
}
