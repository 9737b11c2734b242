//! Parsing and event detection on state-label sequences

use crate::types::Syllable;

/// Parse a raw numeric label value
///
/// Missing, non-finite and fractional values are not valid labels.
pub fn parse_label(value: Option<f64>) -> Option<Syllable> {
    let v = value?;
    if !v.is_finite() || v.fract() != 0.0 {
        return None;
    }
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    Some(v as Syllable)
}

/// Indices of initiation events
///
/// Frame `i` is an initiation when its label is present and differs from the
/// label at `i - 1`; a missing predecessor counts as different. Frame 0 has no
/// predecessor and never qualifies.
pub fn initiation_indices(labels: &[Option<Syllable>]) -> Vec<usize> {
    labels
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| match (pair[0], pair[1]) {
            (_, None) => None,
            (Some(prev), Some(cur)) if prev == cur => None,
            _ => Some(i + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label(Some(3.0)), Some(3));
        assert_eq!(parse_label(Some(-1.0)), Some(-1));
        assert_eq!(parse_label(Some(2.5)), None);
        assert_eq!(parse_label(Some(f64::NAN)), None);
        assert_eq!(parse_label(Some(f64::INFINITY)), None);
        assert_eq!(parse_label(None), None);
    }

    #[test]
    fn test_first_frame_is_never_an_initiation() {
        let labels = vec![Some(5), Some(5), Some(7)];
        assert_eq!(initiation_indices(&labels), vec![2]);
    }

    #[test]
    fn test_missing_labels() {
        let labels = vec![Some(1), None, Some(1), Some(1), None, None, Some(2)];
        // Returning to a label after a gap starts a new bout
        assert_eq!(initiation_indices(&labels), vec![2, 6]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(initiation_indices(&[]).is_empty());
        assert!(initiation_indices(&[Some(1)]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_initiations_are_label_changes(
            raw in proptest::collection::vec(proptest::option::of(0i64..4), 0..200)
        ) {
            let idx = initiation_indices(&raw);
            for &i in &idx {
                prop_assert!(i > 0);
                prop_assert!(raw[i].is_some());
                prop_assert_ne!(raw[i], raw[i - 1]);
            }
            // Every unlisted present frame repeats its predecessor
            for i in 1..raw.len() {
                if raw[i].is_some() && !idx.contains(&i) {
                    prop_assert_eq!(raw[i], raw[i - 1]);
                }
            }
        }
    }
}
