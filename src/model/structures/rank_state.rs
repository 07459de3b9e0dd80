use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A record's temperature and the instant it was last written.
/// The two values are always persisted together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankState {
    pub score: f64,
    pub recorded_at: DateTime<FixedOffset>
}

impl RankState {
    pub fn new(score: f64, recorded_at: DateTime<FixedOffset>) -> Self {
        RankState { score, recorded_at }
    }
}
