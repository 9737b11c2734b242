//! Utility functions for working with data slices

use std::cmp::Ordering;

/// Total order on f64 with NaN placed after every number
fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Indices that stably sort `data` ascending, NaN last
///
/// # Examples
///
/// ```rust
/// use photosyl_core::utils::stable_argsort;
///
/// assert_eq!(stable_argsort(&[3.0, 1.0, 3.0, 0.5]), vec![3, 1, 0, 2]);
/// ```
pub fn stable_argsort(data: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..data.len()).collect();
    idx.sort_by(|&a, &b| nan_last(data[a], data[b]));
    idx
}

/// First index at which `value` could be inserted keeping `sorted` ordered
///
/// # Examples
///
/// ```rust
/// use photosyl_core::utils::search_sorted_left;
///
/// let ts = [1.0, 2.0, 2.0, 4.0];
/// assert_eq!(search_sorted_left(&ts, 2.0), 1);
/// assert_eq!(search_sorted_left(&ts, 3.0), 3);
/// assert_eq!(search_sorted_left(&ts, 9.0), 4);
/// ```
pub fn search_sorted_left(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|&x| x < value)
}

/// Mean of the non-NaN values, NaN when there are none
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divides by n)
pub fn population_std(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let var = data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64;
    var.sqrt()
}

/// Centered rolling mean with a minimum of one valid sample
///
/// The window around position `i` spans `i - window / 2` through
/// `i + window - 1 - window / 2`, truncated at the slice edges. NaN samples are
/// skipped; a position whose window holds no valid sample stays NaN.
///
/// # Examples
///
/// ```rust
/// use photosyl_core::utils::centered_rolling_mean;
///
/// let smoothed = centered_rolling_mean(&[0.0, 3.0, 6.0, 9.0], 3);
/// assert_eq!(smoothed, vec![1.5, 3.0, 6.0, 7.5]);
/// ```
pub fn centered_rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    let n = data.len();
    if window <= 1 {
        return data.to_vec();
    }
    let left = window / 2;
    let right = window - 1 - left;

    // Prefix sums over valid samples keep this linear in n
    let mut sums = Vec::with_capacity(n + 1);
    let mut counts = Vec::with_capacity(n + 1);
    sums.push(0.0);
    counts.push(0usize);
    for &x in data {
        let (s, c) = (sums[sums.len() - 1], counts[counts.len() - 1]);
        if x.is_nan() {
            sums.push(s);
            counts.push(c);
        } else {
            sums.push(s + x);
            counts.push(c + 1);
        }
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right + 1).min(n);
            let count = counts[hi] - counts[lo];
            if count == 0 {
                f64::NAN
            } else {
                (sums[hi] - sums[lo]) / count as f64
            }
        })
        .collect()
}
