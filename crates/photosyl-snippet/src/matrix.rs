//! Fixed-width snippet storage and per-sample summaries

use photosyl_core::{utils::mean, Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Stack of equal-length snippets, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetMatrix {
    width: usize,
    data: Vec<f64>,
}

/// Per-sample mean and confidence band of a snippet stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetSummary {
    pub mean: Vec<f64>,
    /// Half-width of the confidence interval around `mean`
    pub ci_half_width: Vec<f64>,
    /// Number of snippets summarized
    pub count: usize,
}

impl SnippetMatrix {
    /// Create an empty stack for snippets of `width` samples
    pub fn new(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    /// Append one snippet
    pub fn push(&mut self, snippet: &[f64]) -> Result<()> {
        if snippet.len() != self.width {
            return Err(Error::size_mismatch(self.width, snippet.len(), "snippet"));
        }
        self.data.extend_from_slice(snippet);
        Ok(())
    }

    /// Append every snippet of `other`
    pub fn append(&mut self, other: &SnippetMatrix) -> Result<()> {
        if other.width != self.width {
            return Err(Error::size_mismatch(self.width, other.width, "snippet stack"));
        }
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    /// Samples per snippet
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of snippets
    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.data.get(i * self.width..(i + 1) * self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.width.max(1))
    }

    fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |row| row[j])
    }

    /// Per-sample mean across snippets; NaN samples propagate
    pub fn mean(&self) -> Vec<f64> {
        (0..self.width)
            .map(|j| mean(&self.column(j).collect::<Vec<_>>()))
            .collect()
    }

    /// Mean and confidence band at the given confidence level
    ///
    /// The half-width is the standard error of the mean (NaN samples omitted,
    /// one degree of freedom removed) times the two-sided Student t critical
    /// value with `count - 1` degrees of freedom. A single snippet has a
    /// zero-width band.
    pub fn summary(&self, confidence: f64) -> Result<SnippetSummary> {
        if !(0.0..1.0).contains(&confidence) || confidence == 0.0 {
            return Err(Error::InvalidParameter(format!(
                "confidence must be in (0, 1), got {confidence}"
            )));
        }
        let count = self.len();
        if count == 0 {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        }

        let mean = self.mean();
        if count == 1 {
            return Ok(SnippetSummary {
                ci_half_width: vec![0.0; self.width],
                mean,
                count,
            });
        }

        let t_dist = StudentsT::new(0.0, 1.0, (count - 1) as f64).map_err(|e| {
            Error::Computation(format!("Failed to create t-distribution: {}", e))
        })?;
        let critical = t_dist.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);

        let ci_half_width = (0..self.width)
            .map(|j| standard_error(self.column(j)) * critical)
            .collect();

        Ok(SnippetSummary {
            mean,
            ci_half_width,
            count,
        })
    }

    /// Average over samples of the per-sample standard error
    ///
    /// Uses the population standard deviation, giving one number that tracks
    /// how certain the mean trace is overall.
    pub fn mean_standard_error(&self) -> Option<f64> {
        if self.is_empty() || self.width == 0 {
            return None;
        }
        let n = self.len() as f64;
        let per_sample: Vec<f64> = (0..self.width)
            .map(|j| {
                let column: Vec<f64> = self.column(j).collect();
                photosyl_core::utils::population_std(&column) / n.sqrt()
            })
            .collect();
        Some(mean(&per_sample))
    }
}

/// Sample standard error of the non-NaN values
fn standard_error(values: impl Iterator<Item = f64>) -> f64 {
    let valid: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
    if valid.len() < 2 {
        return f64::NAN;
    }
    let n = valid.len() as f64;
    let m = valid.iter().sum::<f64>() / n;
    let var = valid.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    (var / n).sqrt()
}
