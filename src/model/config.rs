use crate::model::{
    constants::{DEFAULT_BOOST, DEFAULT_COOLING_RATE, DEFAULT_INITIAL},
    error::RankError,
    rules::{ScoreRule, TimeRule}
};
use std::env;

/// Configuration for a [`RankUpdater`](crate::model::rank_updater::RankUpdater).
/// Read-only once handed to the updater.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Temperature given to a brand new record
    pub initial: f64,
    /// Increment used by `boost` when the record carries no boost value
    pub default_boost: f64,
    /// Larger values cool more slowly. Must be positive.
    pub cooling_rate: f64,
    pub score_rule: ScoreRule,
    pub time_rule: TimeRule
}

impl RankConfig {
    pub fn new(initial: f64, default_boost: f64, cooling_rate: f64) -> Self {
        Self {
            initial,
            default_boost,
            cooling_rate,
            score_rule: ScoreRule::Default,
            time_rule: TimeRule::Now
        }
    }

    /// Creates a configuration from environment variables.
    /// Unset variables fall back to the defaults.
    ///
    /// - `RANK_INITIAL`
    /// - `RANK_DEFAULT_BOOST`
    /// - `RANK_COOLING_RATE`
    pub fn from_env() -> Result<Self, RankError> {
        Ok(Self::new(
            env_f64("RANK_INITIAL", DEFAULT_INITIAL)?,
            env_f64("RANK_DEFAULT_BOOST", DEFAULT_BOOST)?,
            env_f64("RANK_COOLING_RATE", DEFAULT_COOLING_RATE)?
        ))
    }

    pub fn with_score_rule(mut self, rule: ScoreRule) -> Self {
        self.score_rule = rule;
        self
    }

    pub fn with_time_rule(mut self, rule: TimeRule) -> Self {
        self.time_rule = rule;
        self
    }

    pub fn validate(&self) -> Result<(), RankError> {
        if !self.cooling_rate.is_finite() || self.cooling_rate <= 0.0 {
            return Err(RankError::InvalidConfiguration(format!(
                "cooling rate must be a positive number, got {}",
                self.cooling_rate
            )));
        }

        Ok(())
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL, DEFAULT_BOOST, DEFAULT_COOLING_RATE)
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64, RankError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| RankError::InvalidConfiguration(format!("{} must be a number, got '{}'", key, value))),
        Err(_) => Ok(default)
    }
}
