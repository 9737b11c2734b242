//! Distance-matrix comparison between photometry signatures and behavior
//!
//! Mean snippet traces per label become signatures; standardized cosine
//! distances between them form the signal distance matrix. Each externally
//! supplied behavior matrix is compared with it on their shared labels by a
//! Spearman correlation of the upper triangles and a Mantel permutation test.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use photosyl_distance::{BehaviorDistances, DistanceComparator, DistanceMatrix};
//! use std::collections::BTreeMap;
//!
//! let signatures: BTreeMap<i64, Vec<f64>> = [
//!     (0, vec![0.0, 1.0, 2.0]),
//!     (1, vec![2.0, 1.0, 0.0]),
//!     (2, vec![1.0, 3.0, 1.0]),
//!     (3, vec![0.5, 0.0, 2.5]),
//! ]
//! .into();
//! let signal = DistanceMatrix::from_signatures(&signatures).unwrap();
//!
//! let behavior = BehaviorDistances::new("self", signal.labels().to_vec(), signal.values().clone());
//! let report = DistanceComparator::default().compare(&signal, &[behavior]);
//! assert!((report.comparisons[0].spearman.r - 1.0).abs() < 1e-12);
//! ```

pub mod compare;
pub mod correlation;
pub mod mantel;
pub mod matrix;

pub use compare::{BehaviorDistances, ComparisonReport, DistanceComparator, MatrixComparison};
pub use correlation::{average_ranks, spearman, Correlation};
pub use mantel::{MantelResult, MantelTest};
pub use matrix::{upper_triangle, validate_distances, DistanceMatrix};
