//! Common test utilities for photosyl-snippet tests

#![allow(dead_code)]

use photosyl_core::{SubjectId, Timeline};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Random timeline: labels change every 20-80 frames, injection time ramps
/// through both phase windows, signals are noisy with occasional gaps
pub fn random_timeline(id: &str, genotype: &str, frames: usize, seed: u64) -> Timeline {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut labels = Vec::with_capacity(frames);
    while labels.len() < frames {
        let label = rng.gen_range(0..8i64);
        let run = rng.gen_range(20..80);
        labels.extend(std::iter::repeat(Some(label)).take(run));
    }
    labels.truncate(frames);

    let time: Vec<Option<f64>> = (0..frames)
        .map(|i| Some(-30.0 + 75.0 * i as f64 / frames as f64))
        .collect();
    let mut signal = || -> Vec<f64> {
        (0..frames)
            .map(|_| {
                if rng.gen_bool(0.01) {
                    f64::NAN
                } else {
                    rng.gen_range(-1.0..1.0)
                }
            })
            .collect()
    };
    let dorsal = signal();
    let ventral = signal();

    Timeline::new(SubjectId::new(id), genotype, labels, time, dorsal, ventral).unwrap()
}

pub fn cohort(size: usize, frames: usize) -> BTreeMap<SubjectId, Timeline> {
    (0..size)
        .map(|i| {
            let genotype = if i % 2 == 0 { "WT" } else { "KO" };
            let t = random_timeline(&format!("{i}"), genotype, frames, 100 + i as u64);
            (t.subject().clone(), t)
        })
        .collect()
}
