//! Unit tests that need access to crate-private items

#[cfg(test)]
mod tests {
    use crate::columns::column_names;
    use crate::methods::align::nearest_indices;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_nearest_never_beaten_by_another_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut signal: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..100.0)).collect();
        signal.sort_by(|a, b| a.total_cmp(b));
        let targets: Vec<f64> = (0..500).map(|_| rng.gen_range(-5.0..105.0)).collect();

        for (t, i) in targets.iter().zip(nearest_indices(&targets, &signal)) {
            let best = signal
                .iter()
                .map(|s| (s - t).abs())
                .fold(f64::INFINITY, f64::min);
            assert_eq!((signal[i] - t).abs(), best);
        }
    }

    #[test]
    fn test_column_names_in_order() {
        let df = polars::df!["b" => [1], "a" => [2]].unwrap();
        assert_eq!(column_names(&df), vec!["b", "a"]);
    }
}
