//! Label-indexed distance matrices

use nalgebra::DMatrix;
use photosyl_core::utils::{mean, population_std};
use photosyl_core::{Error, Result, Syllable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Square distance matrix over an ordered label set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    labels: Vec<Syllable>,
    values: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Wrap `values`, whose rows and columns follow `labels`
    pub fn new(labels: Vec<Syllable>, values: DMatrix<f64>) -> Result<Self> {
        if !values.is_square() {
            return Err(Error::InvalidInput(format!(
                "distance matrix is {}x{}, expected square",
                values.nrows(),
                values.ncols()
            )));
        }
        if values.nrows() != labels.len() {
            return Err(Error::size_mismatch(labels.len(), values.nrows(), "distance matrix labels"));
        }
        Ok(Self { labels, values })
    }

    /// Cosine distances between standardized signatures
    ///
    /// Each feature is centered and scaled to unit population variance across
    /// labels (constant features are only centered). Distances are clamped to
    /// `[0, 2]`; a signature with zero norm has NaN distance to every other
    /// label. Labels follow the map's ascending order.
    pub fn from_signatures(signatures: &BTreeMap<Syllable, Vec<f64>>) -> Result<Self> {
        let labels: Vec<Syllable> = signatures.keys().copied().collect();
        let Some(width) = signatures.values().next().map(Vec::len) else {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        };
        if let Some(bad) = signatures.values().find(|s| s.len() != width) {
            return Err(Error::size_mismatch(width, bad.len(), "signature"));
        }

        let mut features = DMatrix::from_fn(labels.len(), width, |i, j| signatures[&labels[i]][j]);
        standardize_columns(&mut features);

        let n = labels.len();
        let norms: Vec<f64> = features.row_iter().map(|row| row.norm()).collect();
        let mut values = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = if norms[i] == 0.0 || norms[j] == 0.0 {
                    f64::NAN
                } else {
                    let dot = features.row(i).dot(&features.row(j));
                    (1.0 - dot / (norms[i] * norms[j])).clamp(0.0, 2.0)
                };
                values[(i, j)] = d;
                values[(j, i)] = d;
            }
        }

        Self::new(labels, values)
    }

    pub fn labels(&self) -> &[Syllable] {
        &self.labels
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label`, first occurrence
    pub fn index_of(&self, label: Syllable) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    pub fn get(&self, a: Syllable, b: Syllable) -> Option<f64> {
        Some(self.values[(self.index_of(a)?, self.index_of(b)?)])
    }

    /// Rows and columns for `labels`, in that order
    pub fn restrict(&self, labels: &[Syllable]) -> Result<DMatrix<f64>> {
        let idx = labels
            .iter()
            .map(|&l| {
                self.index_of(l)
                    .ok_or_else(|| Error::InvalidInput(format!("label {l} not in distance matrix")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DMatrix::from_fn(idx.len(), idx.len(), |i, j| self.values[(idx[i], idx[j])]))
    }
}

/// Center each column and scale it to unit population variance
fn standardize_columns(features: &mut DMatrix<f64>) {
    for mut column in features.column_iter_mut() {
        let values: Vec<f64> = column.iter().copied().collect();
        let m = mean(&values);
        let sd = population_std(&values);
        let scale = if sd == 0.0 { 1.0 } else { sd };
        column.iter_mut().for_each(|x| *x = (*x - m) / scale);
    }
}

/// Entries above the diagonal, row by row
pub fn upper_triangle(values: &DMatrix<f64>) -> Vec<f64> {
    let n = values.nrows();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(values[(i, j)]);
        }
    }
    out
}

/// Check that `values` is square, symmetric and has a zero diagonal
pub fn validate_distances(values: &DMatrix<f64>) -> Result<()> {
    if !values.is_square() {
        return Err(Error::InvalidInput(format!(
            "distance matrix is {}x{}, expected square",
            values.nrows(),
            values.ncols()
        )));
    }
    let n = values.nrows();
    for i in 0..n {
        if values[(i, i)] != 0.0 {
            return Err(Error::InvalidInput(format!(
                "distance matrix is not hollow: entry ({i}, {i}) is {}",
                values[(i, i)]
            )));
        }
        for j in (i + 1)..n {
            let (a, b) = (values[(i, j)], values[(j, i)]);
            if (a - b).abs() > SYMMETRY_TOLERANCE || a.is_nan() != b.is_nan() {
                return Err(Error::InvalidInput(format!(
                    "distance matrix is not symmetric at ({i}, {j})"
                )));
            }
        }
    }
    Ok(())
}
