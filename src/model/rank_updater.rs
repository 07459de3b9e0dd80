use crate::model::{
    clock::{Clock, SystemClock},
    config::RankConfig,
    decay::decay_at,
    error::RankError,
    rules::{ScoreRule, TimeRule},
    store::RankStore,
    structures::{rank_context::RankContext, rank_state::RankState, rank_trigger::RankTrigger}
};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use tracing::{debug, info};

/// Cools and reheats record temperatures.
///
/// The updater holds no per-record state, so one instance can be shared
/// across tasks. Two concurrent heats of the *same* record race: both read
/// the old state and the later write wins.
#[derive(Clone)]
pub struct RankUpdater {
    config: RankConfig,
    clock: Arc<dyn Clock>
}

impl RankUpdater {
    /// Creates an updater on the system clock.
    /// Fails with [`RankError::InvalidConfiguration`] if the cooling rate is not positive.
    pub fn new(config: RankConfig) -> Result<Self, RankError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RankConfig, clock: Arc<dyn Clock>) -> Result<Self, RankError> {
        config.validate()?;

        Ok(RankUpdater { config, clock })
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Initial (score, timestamp) for a record about to be inserted.
    /// Must be called exactly once per record, before its first write.
    pub fn initialize_on_create(&self, record_id: Option<i32>) -> RankState {
        let ctx = self.context(record_id, RankTrigger::Create);
        let score = match &self.config.score_rule {
            ScoreRule::Default => self.config.initial,
            ScoreRule::Constant(value) => *value,
            ScoreRule::Computed(f) => f(self.config.initial, &ctx)
        };

        RankState::new(score, self.time_value(&ctx))
    }

    /// Computes the state a heat by `increment` would write, without writing it.
    pub fn next_heat(
        &self,
        current: Option<RankState>,
        increment: f64,
        ctx: &RankContext
    ) -> Result<RankState, RankError> {
        let current = current.ok_or_else(|| {
            RankError::InvalidOperation("Updating the rank is not possible on a new record".to_string())
        })?;

        let score = match &self.config.score_rule {
            ScoreRule::Default => decay_at(current.score, current.recorded_at, self.config.cooling_rate, ctx.now) + increment,
            ScoreRule::Constant(value) => *value,
            ScoreRule::Computed(f) => f(increment, ctx)
        };

        Ok(RankState::new(score, self.time_value(ctx)))
    }

    /// Cools the record's stored temperature to now, adds `increment`,
    /// and writes the new (score, timestamp) pair.
    pub async fn heat<S: RankStore>(
        &self,
        store: &S,
        record_id: i32,
        increment: f64
    ) -> Result<RankState, RankError<S::Error>> {
        self.apply(store, record_id, increment, RankTrigger::Heat).await
    }

    /// Heats the record by `increment`, or when it is `None`, by the record's
    /// own boost value falling back to the configured default boost.
    pub async fn boost<S: RankStore>(
        &self,
        store: &S,
        record_id: i32,
        increment: Option<f64>
    ) -> Result<RankState, RankError<S::Error>> {
        let increment = match increment {
            Some(up) => up,
            None => store
                .boost_value(record_id)
                .await
                .map_err(RankError::Store)?
                .unwrap_or(self.config.default_boost)
        };

        debug!(record_id, increment, "Resolved boost increment");
        self.apply(store, record_id, increment, RankTrigger::Boost).await
    }

    /// Present-day value of a stored state.
    pub fn current_score(&self, state: &RankState) -> f64 {
        decay_at(state.score, state.recorded_at, self.config.cooling_rate, self.clock.now())
    }

    async fn apply<S: RankStore>(
        &self,
        store: &S,
        record_id: i32,
        increment: f64,
        trigger: RankTrigger
    ) -> Result<RankState, RankError<S::Error>> {
        let current = store.read_rank(record_id).await.map_err(RankError::Store)?;
        let ctx = self.context(Some(record_id), trigger);
        let next = self.next_heat(current, increment, &ctx).map_err(|e| e.with_store())?;

        store.write_rank(record_id, next).await.map_err(RankError::Store)?;

        info!(
            record_id,
            increment,
            score = next.score,
            %trigger,
            "Rank updated"
        );

        Ok(next)
    }

    fn context(&self, record_id: Option<i32>, trigger: RankTrigger) -> RankContext {
        RankContext {
            record_id,
            trigger,
            now: self.clock.now()
        }
    }

    fn time_value(&self, ctx: &RankContext) -> DateTime<FixedOffset> {
        match &self.config.time_rule {
            TimeRule::Now => ctx.now,
            TimeRule::Constant(time) => *time,
            TimeRule::Computed(f) => f(ctx)
        }
    }
}
