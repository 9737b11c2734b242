//! Synthetic cohort for end-to-end tests

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const FPS: f64 = 60.0;

/// Raw tables of one synthetic recording
pub struct RawSession {
    pub group: String,
    pub state: DataFrame,
    pub tracking: DataFrame,
    pub fiber: DataFrame,
}

/// Install a test log subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// One subject: labels in runs, tracking with three present runs, a fiber
/// clock offset from the behavior clock and sampled a little faster
pub fn raw_session(id: u32, genotype: &str, frames: usize, seed: u64) -> RawSession {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let behavior_ts: Vec<f64> = (0..frames).map(|i| 1000.0 + i as f64 / FPS).collect();
    let mut labels = Vec::with_capacity(frames);
    while labels.len() < frames {
        let label = rng.gen_range(0..6i64);
        let run = rng.gen_range(15..60);
        labels.extend(std::iter::repeat(label).take(run));
    }
    labels.truncate(frames);

    let third = frames / 3;
    let x: Vec<Option<f64>> = (0..frames)
        .map(|i| {
            let in_gap = (third - 200..third).contains(&i) || (2 * third - 200..2 * third).contains(&i);
            (!in_gap).then(|| (i as f64 * 0.01).sin())
        })
        .collect();

    let fiber_rows = frames + frames / 10;
    let fiber_ts: Vec<f64> = (0..fiber_rows).map(|i| 1000.003 + i as f64 / (FPS * 1.1)).collect();
    // Injection-relative minutes running from -30 through +45
    let minutes: Vec<f64> = (0..fiber_rows)
        .map(|i| -30.0 + 75.0 * i as f64 / fiber_rows as f64)
        .collect();
    let ds: Vec<f64> = (0..fiber_rows).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let vs: Vec<f64> = (0..fiber_rows).map(|_| rng.gen_range(-1.0..1.0)).collect();

    RawSession {
        group: format!("T{id}_session"),
        state: df![
            "syllable_0" => labels,
            "BonsaiTrackingTimestamp" => behavior_ts.clone(),
            "SecFromInjection" => (0..frames).map(|i| -30.0 + 75.0 * i as f64 / frames as f64).collect::<Vec<_>>(),
            "Genotype" => vec![genotype; frames]
        ]
        .unwrap(),
        tracking: df![
            "BonsaiTrackingTimestamp" => behavior_ts,
            "FrameNo" => (0..frames as i64).collect::<Vec<_>>(),
            "X" => x
        ]
        .unwrap(),
        fiber: df![
            "BonsaiFlyTimestamp" => fiber_ts,
            "SecFromInjection" => minutes,
            "Genotype" => vec![genotype; fiber_rows],
            "Fiber1_ZdFF_scaled" => vs,
            "Fiber3_ZdFF_scaled" => ds
        ]
        .unwrap(),
    }
}
