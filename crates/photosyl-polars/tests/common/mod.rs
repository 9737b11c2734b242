//! Common test utilities for photosyl-polars tests

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// State-label table stamped on the behavior clock at 60 fps
pub fn state_table(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let timestamps: Vec<f64> = (0..rows).map(|i| i as f64 / 60.0).collect();
    let labels: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..5)).collect();
    let injection: Vec<f64> = (0..rows).map(|i| -30.0 + i as f64 / 60.0).collect();
    df![
        "BonsaiTrackingTimestamp" => timestamps,
        "syllable_0" => labels,
        "SecFromInjection" => injection,
        "Genotype" => vec!["WT"; rows]
    ]
    .unwrap()
}

pub fn tracking_table(rows: usize) -> DataFrame {
    let timestamps: Vec<f64> = (0..rows).map(|i| i as f64 / 60.0).collect();
    let x: Vec<f64> = (0..rows).map(|i| (i as f64 * 0.1).sin()).collect();
    df![
        "BonsaiTrackingTimestamp" => timestamps,
        "X" => x.clone(),
        "Y" => x
    ]
    .unwrap()
}

/// Fiber table sampled at the given timestamps
pub fn fiber_table(timestamps: &[f64]) -> DataFrame {
    let rows = timestamps.len();
    let ramp: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    df![
        "BonsaiFlyTimestamp" => timestamps.to_vec(),
        "SecFromInjection" => timestamps.iter().map(|t| t - 30.0).collect::<Vec<_>>(),
        "Genotype" => vec!["WT"; rows],
        "FrameNo" => (0..rows as i64).collect::<Vec<_>>(),
        "Fiber1_ZdFF_scaled" => ramp.clone(),
        "Fiber3_ZdFF_scaled" => ramp
    ]
    .unwrap()
}

/// Float values of a merged column, nulls as NaN
pub fn floats(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect()
}
