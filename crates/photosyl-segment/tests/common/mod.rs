//! Common test utilities for photosyl-segment tests

use photosyl_segment::TrackingSeries;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Build a tracking series with present runs at the given spans
///
/// Present frames carry a noisy coordinate; everything else is NaN.
pub fn tracking_with_runs(runs: &[(usize, usize)], len: usize, seed: u64) -> TrackingSeries {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut coordinates = vec![f64::NAN; len];
    for &(start, end) in runs {
        for x in &mut coordinates[start..end] {
            *x = 320.0 + rng.gen_range(-50.0..50.0);
        }
    }
    let timestamps = (0..len).map(|i| 50_000.0 + i as f64 / 60.0).collect();
    TrackingSeries::new(coordinates, timestamps)
}

/// Three runs with randomized gaps, all long enough to qualify
pub fn well_formed_session(seed: u64) -> (TrackingSeries, Vec<(usize, usize)>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut runs = Vec::new();
    let mut cursor = rng.gen_range(0..120);
    for _ in 0..3 {
        let len = rng.gen_range(241..2000);
        runs.push((cursor, cursor + len));
        cursor += len + rng.gen_range(1..600);
    }
    (tracking_with_runs(&runs, cursor, seed), runs)
}
