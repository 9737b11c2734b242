//! Borda ranking of syllables across a cohort
//!
//! Each label gets two cohort-average scores, its share of initiations and
//! its share of occupied frames. Both score lists are ranked and the ranks
//! converted to Borda points (`labels - rank`), which are summed.
//!
//! Ties are broken deterministically: score lists are sorted stably from
//! ascending label order, and the final ranking is a stable sort of the
//! initiation ranking, so equal totals keep their initiation-ranking order.

use crate::usage::SyllableUsage;
use ordered_float::OrderedFloat;
use photosyl_core::{SubjectId, Syllable, Timeline};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Cohort-level usage scores and the resulting ranking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllableRanking {
    pub average_initiations: BTreeMap<Syllable, f64>,
    pub average_occupancy: BTreeMap<Syllable, f64>,
    /// Total Borda points per label
    pub borda_scores: BTreeMap<Syllable, usize>,
    ranking: Vec<(Syllable, usize)>,
}

impl SyllableRanking {
    /// Labels with their Borda totals, best first
    pub fn ranking(&self) -> &[(Syllable, usize)] {
        &self.ranking
    }

    /// The `k` best-ranked labels
    pub fn top(&self, k: usize) -> Vec<Syllable> {
        self.ranking.iter().take(k).map(|(label, _)| *label).collect()
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

/// Ranks syllables by cohort usage
#[derive(Debug, Clone, Default)]
pub struct SyllableRanker;

impl SyllableRanker {
    pub fn new() -> Self {
        Self
    }

    /// Rank from one label column per subject
    pub fn rank<'a, I>(&self, subjects: I) -> SyllableRanking
    where
        I: IntoIterator<Item = &'a [Option<Syllable>]>,
    {
        let usages: Vec<SyllableUsage> = subjects
            .into_iter()
            .map(SyllableUsage::from_labels)
            .collect();
        self.rank_usage(&usages)
    }

    /// Rank from parsed subject timelines
    #[instrument(skip_all, fields(subjects = timelines.len()))]
    pub fn rank_timelines(&self, timelines: &BTreeMap<SubjectId, Timeline>) -> SyllableRanking {
        self.rank(timelines.values().map(Timeline::labels))
    }

    /// Rank from precomputed per-subject usage
    pub fn rank_usage(&self, usages: &[SyllableUsage]) -> SyllableRanking {
        let labels: BTreeSet<Syllable> = usages.iter().flat_map(SyllableUsage::labels).collect();
        if usages.is_empty() || labels.is_empty() {
            return SyllableRanking::default();
        }

        let subjects = usages.len() as f64;
        let average = |score: fn(&SyllableUsage, Syllable) -> f64| -> BTreeMap<Syllable, f64> {
            labels
                .iter()
                .map(|&label| {
                    let total: f64 = usages.iter().map(|u| score(u, label)).sum();
                    (label, total / subjects)
                })
                .collect()
        };
        let average_initiations = average(SyllableUsage::initiation_proportion);
        let average_occupancy = average(SyllableUsage::occupancy_proportion);

        let by_initiations = descending(&average_initiations);
        let by_occupancy = descending(&average_occupancy);

        let n = labels.len();
        let mut borda_scores: BTreeMap<Syllable, usize> = BTreeMap::new();
        for order in [&by_initiations, &by_occupancy] {
            for (rank, label) in order.iter().enumerate() {
                *borda_scores.entry(*label).or_default() += n - rank;
            }
        }

        let mut ranking: Vec<(Syllable, usize)> = by_initiations
            .iter()
            .map(|label| (*label, borda_scores[label]))
            .collect();
        ranking.sort_by_key(|(_, points)| Reverse(*points));

        debug!(labels = n, best = ?ranking.first(), "ranked syllables");

        SyllableRanking {
            average_initiations,
            average_occupancy,
            borda_scores,
            ranking,
        }
    }
}

/// Labels ordered by descending score, ties in ascending label order
fn descending(scores: &BTreeMap<Syllable, f64>) -> Vec<Syllable> {
    let mut labels: Vec<(Syllable, f64)> = scores.iter().map(|(l, s)| (*l, *s)).collect();
    labels.sort_by_key(|(_, score)| Reverse(OrderedFloat(*score)));
    labels.into_iter().map(|(label, _)| label).collect()
}
