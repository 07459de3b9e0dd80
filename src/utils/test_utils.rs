use crate::model::{
    clock::FixedClock,
    config::RankConfig,
    rank_updater::RankUpdater
};
use chrono::{DateTime, Duration, FixedOffset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// 1970-01-01T00:00:00+00:00
pub fn epoch() -> DateTime<FixedOffset> {
    DateTime::from_timestamp(0, 0).unwrap().fixed_offset()
}

/// `seconds` after [`epoch`]
pub fn at(seconds: i64) -> DateTime<FixedOffset> {
    epoch() + Duration::seconds(seconds)
}

/// Generates `n` reproducible `(score, cooling_rate, hours)` triples.
pub fn generate_scores(n: usize) -> Vec<(f64, f64, i64)> {
    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (0..n)
        .map(|_| {
            (
                rng.random_range(0.0..=5000.0),
                rng.random_range(0.5..=1000.0),
                rng.random_range(1..=2000)
            )
        })
        .collect()
}

/// An updater whose clock is frozen `seconds` after the epoch.
pub fn updater_at(config: RankConfig, seconds: i64) -> RankUpdater {
    RankUpdater::with_clock(config, Arc::new(FixedClock(at(seconds)))).unwrap()
}
