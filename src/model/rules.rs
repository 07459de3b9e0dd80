use crate::model::structures::rank_context::RankContext;
use chrono::{DateTime, FixedOffset};
use std::{fmt, sync::Arc};

pub type ScoreFn = dyn Fn(f64, &RankContext) -> f64 + Send + Sync;
pub type TimeFn = dyn Fn(&RankContext) -> DateTime<FixedOffset> + Send + Sync;

/// How the next score is produced.
#[derive(Clone, Default)]
pub enum ScoreRule {
    /// Decay the previous score, then add the increment.
    /// A brand new record has no previous score, so it receives the increment.
    #[default]
    Default,
    /// Always write this value. The increment and previous score are ignored.
    Constant(f64),
    /// Called with `(increment, context)`; its result is written as-is.
    Computed(Arc<ScoreFn>)
}

impl ScoreRule {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(f64, &RankContext) -> f64 + Send + Sync + 'static
    {
        ScoreRule::Computed(Arc::new(f))
    }
}

impl fmt::Debug for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreRule::Default => write!(f, "Default"),
            ScoreRule::Constant(value) => write!(f, "Constant({})", value),
            ScoreRule::Computed(_) => write!(f, "Computed(..)")
        }
    }
}

/// How the recorded timestamp is produced.
#[derive(Clone, Default)]
pub enum TimeRule {
    /// The engine's clock reading.
    #[default]
    Now,
    Constant(DateTime<FixedOffset>),
    Computed(Arc<TimeFn>)
}

impl TimeRule {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RankContext) -> DateTime<FixedOffset> + Send + Sync + 'static
    {
        TimeRule::Computed(Arc::new(f))
    }
}

impl fmt::Debug for TimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRule::Now => write!(f, "Now"),
            TimeRule::Constant(time) => write!(f, "Constant({})", time.to_rfc3339()),
            TimeRule::Computed(_) => write!(f, "Computed(..)")
        }
    }
}
