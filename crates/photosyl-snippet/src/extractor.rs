//! Snippet extraction around syllable initiations
//!
//! For every initiation of an admissible label that falls inside the pre or
//! post injection window, a window of `m` frames before and `n` frames after
//! the event is cut from each channel, smoothed with a centered rolling mean
//! and shifted so the normalization frame sits at zero.

use crate::collection::ExtractedSnippets;
use photosyl_core::utils::centered_rolling_mean;
use photosyl_core::{Channel, ExtractionParameters, Result, SnippetKey, SubjectId, Timeline};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Cuts normalized signal snippets out of subject timelines
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    params: ExtractionParameters,
}

impl SnippetExtractor {
    /// Create an extractor, validating the parameters
    pub fn new(params: ExtractionParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ExtractionParameters {
        &self.params
    }

    /// Extract every snippet of one subject
    pub fn extract_subject(&self, timeline: &Timeline) -> Result<ExtractedSnippets> {
        let p = &self.params;
        let mut out = ExtractedSnippets::new(p.snippet_len());
        let labels = timeline.labels();
        let times = timeline.injection_time();

        let mut discarded = 0usize;
        for i in timeline.initiations() {
            let Some(label) = labels[i] else { continue };
            if !(0..p.label_count).contains(&label) {
                continue;
            }
            let Some(phase) = times[i].and_then(|t| p.phases.classify(t)) else {
                continue;
            };
            let Some(window) = self.window(i, timeline.len()) else {
                discarded += 1;
                continue;
            };

            let key = SnippetKey::new(timeline.genotype(), phase, label);
            for channel in Channel::ALL {
                let snippet = self.normalize(&timeline.signal(channel)[window.clone()]);
                out.channel_mut(channel).push(key.clone(), &snippet)?;
            }
        }

        debug!(
            subject = %timeline.subject(),
            snippets = out.dorsal.snippet_count(),
            discarded,
            "extracted snippets"
        );
        Ok(out)
    }

    /// Extract and merge snippets of every subject, in subject order
    ///
    /// Subjects are processed independently, on the rayon pool when the
    /// `parallel` feature is enabled. The merge order does not depend on
    /// scheduling, so both builds produce identical collections.
    #[instrument(skip_all, fields(subjects = timelines.len()))]
    pub fn extract_all(&self, timelines: &BTreeMap<SubjectId, Timeline>) -> Result<ExtractedSnippets> {
        #[cfg(feature = "parallel")]
        let per_subject: Vec<Result<ExtractedSnippets>> = timelines
            .par_iter()
            .map(|(_, timeline)| self.extract_subject(timeline))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let per_subject: Vec<Result<ExtractedSnippets>> = timelines
            .values()
            .map(|timeline| self.extract_subject(timeline))
            .collect();

        let mut merged = ExtractedSnippets::new(self.params.snippet_len());
        for snippets in per_subject {
            merged.merge(snippets?)?;
        }
        Ok(merged)
    }

    /// Frame range `[i - m, i + n]`, if it lies inside the timeline
    fn window(&self, i: usize, len: usize) -> Option<std::ops::Range<usize>> {
        let start = i.checked_sub(self.params.m)?;
        let end = i.checked_add(self.params.n)?;
        (end < len).then_some(start..end + 1)
    }

    fn normalize(&self, raw: &[f64]) -> Vec<f64> {
        let smoothed = centered_rolling_mean(raw, self.params.smoothing_window);
        let baseline = smoothed[self.params.normalization_frame];
        smoothed.into_iter().map(|x| x - baseline).collect()
    }
}
