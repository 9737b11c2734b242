//! Rank correlation

use photosyl_core::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Correlation coefficient with its two-sided p-value
///
/// Both fields are NaN when the correlation is undefined (constant input or
/// fewer than three pairs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
}

impl Correlation {
    pub fn undefined() -> Self {
        Self {
            r: f64::NAN,
            p_value: f64::NAN,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.r.is_nan()
    }
}

/// 1-based ranks, ties receiving the average of the ranks they span
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; data.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && data[order[j + 1]] == data[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Pearson correlation, `None` when either side has zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    if x.is_empty() {
        return None;
    }
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Spearman rank correlation with a two-sided p-value
///
/// The p-value uses the Student t approximation with `n - 2` degrees of
/// freedom. Inputs containing NaN give an undefined correlation.
///
/// # Examples
///
/// ```rust
/// use photosyl_distance::spearman;
///
/// let c = spearman(&[1.0, 2.0, 3.0, 4.0], &[10.0, 20.0, 25.0, 90.0]).unwrap();
/// assert_eq!(c.r, 1.0);
/// ```
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "spearman inputs"));
    }
    let n = x.len();
    if n < 3 || x.iter().chain(y).any(|v| v.is_nan()) {
        return Ok(Correlation::undefined());
    }

    let Some(r) = pearson(&average_ranks(x), &average_ranks(y)) else {
        return Ok(Correlation::undefined());
    };

    Ok(Correlation {
        r,
        p_value: t_test_p_value(r, n)?,
    })
}

fn t_test_p_value(r: f64, n: usize) -> Result<f64> {
    let df = (n - 2) as f64;
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let t = r * (df / ((1.0 - r) * (1.0 + r))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Computation(format!("Failed to create t-distribution: {}", e)))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).min(1.0))
}
