//! Comparison of signal-derived and behavior-derived distance structures

use crate::correlation::{spearman, Correlation};
use crate::mantel::{MantelResult, MantelTest};
use crate::matrix::{upper_triangle, DistanceMatrix};
use nalgebra::DMatrix;
use photosyl_core::{
    Availability, ComparisonConfig, Diagnostics, Error, Result, Syllable,
};
use photosyl_snippet::SnippetCollection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Externally supplied behavioral distances with their own label order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDistances {
    /// Where the matrix came from, used to attribute diagnostics
    pub name: String,
    pub labels: Vec<Syllable>,
    pub distances: DMatrix<f64>,
}

impl BehaviorDistances {
    pub fn new(name: impl Into<String>, labels: Vec<Syllable>, distances: DMatrix<f64>) -> Self {
        Self {
            name: name.into(),
            labels,
            distances,
        }
    }
}

/// Statistics for one behavior source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixComparison {
    pub source: String,
    /// Labels both matrices share, ascending
    pub common_labels: Vec<Syllable>,
    pub spearman: Correlation,
    pub mantel: Availability<MantelResult>,
}

/// Results of comparing one signal matrix against every behavior source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub comparisons: Vec<MatrixComparison>,
    /// Sources that were skipped and why
    pub diagnostics: Diagnostics,
}

/// Builds signal distance matrices and compares them with behavior matrices
#[derive(Debug, Clone, Default)]
pub struct DistanceComparator {
    config: ComparisonConfig,
}

impl DistanceComparator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Distance matrix over the mean signatures of one channel
    pub fn signal_distances(&self, snippets: &SnippetCollection) -> Result<DistanceMatrix> {
        let signatures =
            snippets.mean_signatures(self.config.min_snippets, self.config.allowed_labels.as_deref());
        debug!(
            channel = %snippets.channel(),
            labels = signatures.len(),
            "computed mean signatures"
        );
        DistanceMatrix::from_signatures(&signatures)
    }

    /// Compare one channel's signatures against every behavior source
    ///
    /// When no label qualifies for a signature the report holds only a
    /// diagnostic.
    pub fn compare_channel(
        &self,
        snippets: &SnippetCollection,
        behavior: &[BehaviorDistances],
    ) -> ComparisonReport {
        match self.signal_distances(snippets) {
            Ok(signal) => self.compare(&signal, behavior),
            Err(e) => {
                let mut report = ComparisonReport::default();
                report
                    .diagnostics
                    .record_error(format!("channel {}", snippets.channel()), &e);
                report
            }
        }
    }

    /// Compare `signal` against each behavior source on their shared labels
    #[instrument(skip_all, fields(labels = signal.len(), sources = behavior.len()))]
    pub fn compare(&self, signal: &DistanceMatrix, behavior: &[BehaviorDistances]) -> ComparisonReport {
        let mut report = ComparisonReport::default();
        let mantel = MantelTest::new()
            .with_permutations(self.config.permutations)
            .with_seed(self.config.seed);

        for source in behavior {
            let scope = format!("behavior source {}", source.name);
            match self.compare_one(signal, source, &mantel) {
                Ok(comparison) => {
                    debug!(
                        source = %source.name,
                        r = comparison.spearman.r,
                        p = comparison.spearman.p_value,
                        "compared distance matrices"
                    );
                    report.comparisons.push(comparison);
                }
                Err(e) => report.diagnostics.record_error(scope, &e),
            }
        }

        report
    }

    fn compare_one(
        &self,
        signal: &DistanceMatrix,
        source: &BehaviorDistances,
        mantel: &MantelTest,
    ) -> Result<MatrixComparison> {
        let behavior = DistanceMatrix::new(source.labels.clone(), source.distances.clone())?;

        let allowed = self.config.allowed_labels.as_deref();
        let signal_labels: BTreeSet<Syllable> = signal.labels().iter().copied().collect();
        let common: Vec<Syllable> = behavior
            .labels()
            .iter()
            .copied()
            .filter(|l| signal_labels.contains(l))
            .filter(|l| allowed.map_or(true, |a| a.contains(l)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if common.len() < self.config.min_common_labels {
            return Err(Error::InsufficientCommonLabels {
                origin: source.name.clone(),
                found: common.len(),
                required: self.config.min_common_labels,
            });
        }

        let behavior_sub = behavior.restrict(&common)?;
        let signal_sub = signal.restrict(&common)?;
        let spearman = spearman(&upper_triangle(&behavior_sub), &upper_triangle(&signal_sub))?;
        let mantel = Availability::from(mantel.test(&behavior_sub, &signal_sub));
        if let Some(reason) = mantel.reason() {
            debug!(source = %source.name, reason, "mantel test unavailable");
        }

        Ok(MatrixComparison {
            source: source.name.clone(),
            common_labels: common,
            spearman,
            mantel,
        })
    }
}
