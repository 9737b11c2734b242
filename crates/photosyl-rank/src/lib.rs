//! Syllable usage and ranking across a cohort
//!
//! # Example
//!
//! ```rust
//! use photosyl_rank::SyllableRanker;
//!
//! let a = vec![Some(0), Some(1), Some(1), Some(2), Some(1)];
//! let b = vec![Some(1), Some(1), Some(2), None, Some(2)];
//! let ranking = SyllableRanker::new().rank([a.as_slice(), b.as_slice()]);
//!
//! assert_eq!(ranking.top(1), vec![1]);
//! ```

pub mod borda;
pub mod usage;

pub use borda::{SyllableRanker, SyllableRanking};
pub use usage::SyllableUsage;
