//! Snippet buckets keyed by genotype, injection phase and label

use crate::matrix::SnippetMatrix;
use photosyl_core::{Channel, Result, SnippetKey, Syllable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every bucket of one recording channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetCollection {
    channel: Channel,
    width: usize,
    buckets: BTreeMap<SnippetKey, SnippetMatrix>,
}

impl SnippetCollection {
    pub fn new(channel: Channel, width: usize) -> Self {
        Self {
            channel,
            width,
            buckets: BTreeMap::new(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Samples per snippet
    pub fn width(&self) -> usize {
        self.width
    }

    /// Append a snippet to the bucket for `key`
    pub fn push(&mut self, key: SnippetKey, snippet: &[f64]) -> Result<()> {
        let width = self.width;
        self.buckets
            .entry(key)
            .or_insert_with(|| SnippetMatrix::new(width))
            .push(snippet)
    }

    /// Append every bucket of `other`, preserving snippet order within buckets
    pub fn merge(&mut self, other: SnippetCollection) -> Result<()> {
        for (key, matrix) in other.buckets {
            match self.buckets.get_mut(&key) {
                Some(existing) => existing.append(&matrix)?,
                None => {
                    if matrix.width() != self.width {
                        return Err(photosyl_core::Error::size_mismatch(
                            self.width,
                            matrix.width(),
                            "snippet stack",
                        ));
                    }
                    self.buckets.insert(key, matrix);
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &SnippetKey) -> Option<&SnippetMatrix> {
        self.buckets.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SnippetKey, &SnippetMatrix)> {
        self.buckets.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SnippetKey> {
        self.buckets.keys()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total snippets across buckets
    pub fn snippet_count(&self) -> usize {
        self.buckets.values().map(SnippetMatrix::len).sum()
    }

    /// Buckets holding at least `min_snippets` snippets
    pub fn qualifying(
        &self,
        min_snippets: usize,
    ) -> impl Iterator<Item = (&SnippetKey, &SnippetMatrix)> {
        self.buckets
            .iter()
            .filter(move |(_, matrix)| matrix.len() >= min_snippets)
    }

    /// Mean trace per label, pooled across genotypes and phases
    ///
    /// Only buckets that individually hold at least `min_snippets` snippets
    /// contribute, and only labels in `allowed` when given. Every contributing
    /// snippet carries equal weight.
    pub fn mean_signatures(
        &self,
        min_snippets: usize,
        allowed: Option<&[Syllable]>,
    ) -> BTreeMap<Syllable, Vec<f64>> {
        let mut pooled: BTreeMap<Syllable, (Vec<f64>, usize)> = BTreeMap::new();

        for (key, matrix) in self.qualifying(min_snippets) {
            if allowed.is_some_and(|labels| !labels.contains(&key.label)) {
                continue;
            }
            let (sum, count) = pooled
                .entry(key.label)
                .or_insert_with(|| (vec![0.0; self.width], 0));
            for row in matrix.rows() {
                for (acc, x) in sum.iter_mut().zip(row) {
                    *acc += x;
                }
                *count += 1;
            }
        }

        pooled
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(label, (sum, count))| {
                let mean = sum.into_iter().map(|s| s / count as f64).collect();
                (label, mean)
            })
            .collect()
    }
}

/// Snippets of every channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSnippets {
    pub dorsal: SnippetCollection,
    pub ventral: SnippetCollection,
}

impl ExtractedSnippets {
    pub fn new(width: usize) -> Self {
        Self {
            dorsal: SnippetCollection::new(Channel::DorsalStriatum, width),
            ventral: SnippetCollection::new(Channel::VentralStriatum, width),
        }
    }

    pub fn channel(&self, channel: Channel) -> &SnippetCollection {
        match channel {
            Channel::DorsalStriatum => &self.dorsal,
            Channel::VentralStriatum => &self.ventral,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut SnippetCollection {
        match channel {
            Channel::DorsalStriatum => &mut self.dorsal,
            Channel::VentralStriatum => &mut self.ventral,
        }
    }

    pub fn merge(&mut self, other: ExtractedSnippets) -> Result<()> {
        self.dorsal.merge(other.dorsal)?;
        self.ventral.merge(other.ventral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use photosyl_core::InjectionPhase;

    fn filled(channel: Channel, rows: &[(SnippetKey, f64, usize)]) -> SnippetCollection {
        let mut c = SnippetCollection::new(channel, 2);
        for (key, value, count) in rows {
            for _ in 0..*count {
                c.push(key.clone(), &[*value, *value]).unwrap();
            }
        }
        c
    }

    #[test]
    fn test_buckets_are_keyed_and_ordered() {
        let c = filled(
            Channel::DorsalStriatum,
            &[
                (SnippetKey::new("WT", InjectionPhase::Post, 1), 0.0, 2),
                (SnippetKey::new("KO", InjectionPhase::Pre, 5), 0.0, 1),
                (SnippetKey::new("WT", InjectionPhase::Pre, 1), 0.0, 3),
            ],
        );
        let keys: Vec<String> = c.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["KO/pre/5", "WT/pre/1", "WT/post/1"]);
        assert_eq!(c.snippet_count(), 6);
        assert_eq!(c.qualifying(2).count(), 2);
    }

    #[test]
    fn test_mean_signatures_pool_qualifying_buckets() {
        let c = filled(
            Channel::VentralStriatum,
            &[
                (SnippetKey::new("WT", InjectionPhase::Pre, 1), 1.0, 3),
                (SnippetKey::new("KO", InjectionPhase::Post, 1), 5.0, 1),
                (SnippetKey::new("WT", InjectionPhase::Post, 2), 2.0, 2),
                (SnippetKey::new("KO", InjectionPhase::Pre, 3), 3.0, 1),
            ],
        );

        let all = c.mean_signatures(1, None);
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        // Equal weight per snippet: (3 * 1 + 5) / 4
        assert_relative_eq!(all[&1][0], 2.0);

        let strict = c.mean_signatures(2, None);
        assert_eq!(strict.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_relative_eq!(strict[&1][0], 1.0);

        let allowed = c.mean_signatures(1, Some(&[2, 3]));
        assert_eq!(allowed.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_merge_appends_in_order() {
        let key = SnippetKey::new("WT", InjectionPhase::Pre, 0);
        let mut a = filled(Channel::DorsalStriatum, &[(key.clone(), 1.0, 1)]);
        let b = filled(Channel::DorsalStriatum, &[(key.clone(), 2.0, 1)]);
        a.merge(b).unwrap();

        let bucket = a.get(&key).unwrap();
        assert_eq!(bucket.row(0), Some(&[1.0, 1.0][..]));
        assert_eq!(bucket.row(1), Some(&[2.0, 2.0][..]));
    }

    #[test]
    fn test_merge_rejects_width_mismatch() {
        let mut a = SnippetCollection::new(Channel::DorsalStriatum, 2);
        let mut b = SnippetCollection::new(Channel::DorsalStriatum, 3);
        b.push(SnippetKey::new("WT", InjectionPhase::Pre, 0), &[0.0; 3]).unwrap();
        assert!(a.merge(b).is_err());
    }
}
