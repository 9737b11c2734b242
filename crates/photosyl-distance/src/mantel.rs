//! Mantel permutation test between two distance matrices
//!
//! The statistic is the Spearman correlation of the two upper triangles. Its
//! null distribution comes from permuting the rows and columns of the first
//! matrix together; the two-sided p-value is
//! `(#{|r_perm| >= |r|} + 1) / (permutations + 1)`.

use crate::correlation::{average_ranks, pearson};
use crate::matrix::{upper_triangle, validate_distances};
use nalgebra::DMatrix;
use photosyl_core::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of a Mantel test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MantelResult {
    pub statistic: f64,
    pub p_value: f64,
    pub permutations: usize,
}

/// Mantel test with a Spearman statistic
#[derive(Debug, Clone)]
pub struct MantelTest {
    permutations: usize,
    seed: u64,
}

impl Default for MantelTest {
    fn default() -> Self {
        Self {
            permutations: 999,
            seed: 0x5EED,
        }
    }
}

impl MantelTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of permutations
    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Run the test
    ///
    /// Fails when the matrices differ in shape, hold fewer than three labels,
    /// are not symmetric and hollow, or have a constant upper triangle.
    /// Permutation `i` draws from its own generator seeded with `seed + i`, so
    /// the result does not depend on how permutations are scheduled.
    #[instrument(skip(self, x, y), fields(n = x.nrows(), permutations = self.permutations))]
    pub fn test(&self, x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<MantelResult> {
        validate_distances(x)?;
        validate_distances(y)?;
        if x.shape() != y.shape() {
            return Err(Error::InvalidInput(format!(
                "distance matrices differ in shape: {:?} vs {:?}",
                x.shape(),
                y.shape()
            )));
        }
        let n = x.nrows();
        if n < 3 {
            return Err(Error::InsufficientData {
                expected: 3,
                actual: n,
            });
        }

        let x_tri = upper_triangle(x);
        let y_tri = upper_triangle(y);
        if x_tri.iter().chain(&y_tri).any(|v| v.is_nan()) {
            return Err(Error::non_finite("distance matrix"));
        }

        // Permuting labels permutes the condensed entries, so ranks are computed once
        let x_ranks = condensed_to_square(&average_ranks(&x_tri), n);
        let y_ranks = average_ranks(&y_tri);

        let statistic = pearson(&upper_triangle(&x_ranks), &y_ranks).ok_or_else(|| {
            Error::Computation("distance matrix has zero variance".to_string())
        })?;

        let exceeds = |i: usize| -> bool {
            let mut order: Vec<usize> = (0..n).collect();
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
            order.shuffle(&mut rng);
            let permuted = DMatrix::from_fn(n, n, |a, b| x_ranks[(order[a], order[b])]);
            pearson(&upper_triangle(&permuted), &y_ranks)
                .is_some_and(|r| r.abs() >= statistic.abs())
        };

        #[cfg(feature = "parallel")]
        let count = (0..self.permutations).into_par_iter().filter(|&i| exceeds(i)).count();
        #[cfg(not(feature = "parallel"))]
        let count = (0..self.permutations).filter(|&i| exceeds(i)).count();

        let p_value = (count + 1) as f64 / (self.permutations + 1) as f64;
        debug!(statistic, p_value, "mantel test");

        Ok(MantelResult {
            statistic,
            p_value,
            permutations: self.permutations,
        })
    }
}

/// Rebuild a symmetric hollow matrix from its upper triangle
fn condensed_to_square(condensed: &[f64], n: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(n, n);
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            out[(i, j)] = condensed[k];
            out[(j, i)] = condensed[k];
            k += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_distances(points: &[f64]) -> DMatrix<f64> {
        let n = points.len();
        DMatrix::from_fn(n, n, |i, j| (points[i] - points[j]).abs())
    }

    #[test]
    fn test_identical_matrices() {
        let d = line_distances(&[0.0, 1.0, 3.0, 7.0, 15.0, 31.0]);
        let result = MantelTest::new().with_permutations(199).test(&d, &d).unwrap();
        assert_relative_eq!(result.statistic, 1.0);
        // Only the identity-like permutations can match, so p is small
        assert!(result.p_value < 0.05);
        assert!(result.p_value >= 1.0 / 200.0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let x = line_distances(&[0.0, 2.0, 3.0, 9.0, 4.0]);
        let y = line_distances(&[1.0, 0.0, 5.0, 2.0, 8.0]);
        let test = MantelTest::new().with_permutations(99).with_seed(11);
        assert_eq!(test.test(&x, &y).unwrap(), test.test(&x, &y).unwrap());
    }

    #[test]
    fn test_p_value_bounds() {
        let x = line_distances(&[0.0, 2.0, 3.0, 9.0]);
        let y = line_distances(&[5.0, 1.0, 0.0, 2.0]);
        let result = MantelTest::new().with_permutations(50).test(&x, &y).unwrap();
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
        assert_eq!(result.permutations, 50);
    }

    #[test]
    fn test_failures() {
        let mantel = MantelTest::new();
        let small = line_distances(&[0.0, 1.0]);
        assert!(matches!(
            mantel.test(&small, &small),
            Err(Error::InsufficientData { expected: 3, actual: 2 })
        ));

        let x = line_distances(&[0.0, 1.0, 2.0]);
        let y = line_distances(&[0.0, 1.0, 2.0, 3.0]);
        assert!(mantel.test(&x, &y).is_err());

        let mut asym = x.clone();
        asym[(0, 1)] = 5.0;
        assert!(mantel.test(&asym, &x).is_err());

        let flat = DMatrix::from_fn(3, 3, |i, j| if i == j { 0.0 } else { 1.0 });
        assert!(matches!(mantel.test(&flat, &x), Err(Error::Computation(_))));
    }

    #[test]
    fn test_condensed_round_trip() {
        let d = line_distances(&[0.0, 1.0, 4.0, 9.0]);
        assert_eq!(condensed_to_square(&upper_triangle(&d), 4), d);
    }
}
