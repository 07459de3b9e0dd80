use crate::model::constants::SECONDS_PER_HOUR;
use chrono::{DateTime, FixedOffset, Utc};

/// # How this works
/// A temperature recorded at time T cools according to Newton's law:
///
/// `current = recorded * exp(-hours / cooling_rate)`
///
/// where `hours` is the number of *whole* hours between T and the current
/// time. Reading a score several times within the same hour always yields
/// the same value.
///
/// # Rules
/// - No decay is applied when T is now or in the future.
/// - `cooling_rate` must be positive. Larger values cool more slowly.
///
/// Uses the system clock. See [`decay_at`] to supply the current time.
pub fn decay(score: f64, recorded_at: DateTime<FixedOffset>, cooling_rate: f64) -> f64 {
    decay_at(score, recorded_at, cooling_rate, Utc::now().fixed_offset())
}

/// Decays `score` from `recorded_at` up to `now`.
pub fn decay_at(
    score: f64,
    recorded_at: DateTime<FixedOffset>,
    cooling_rate: f64,
    now: DateTime<FixedOffset>
) -> f64 {
    if (now - recorded_at).num_seconds() <= 0 {
        return score;
    }

    let hours = elapsed_hours(recorded_at, now);
    score * (-(hours as f64) / cooling_rate).exp()
}

/// Whole hours elapsed between `recorded_at` and `now`, floored.
/// Returns 0 when `now` is not after `recorded_at`.
pub fn elapsed_hours(recorded_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> i64 {
    let seconds = (now - recorded_at).num_seconds();
    if seconds <= 0 {
        return 0;
    }

    seconds / SECONDS_PER_HOUR
}
