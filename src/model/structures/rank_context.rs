use super::rank_trigger::RankTrigger;
use chrono::{DateTime, FixedOffset};

/// Handed to computed score and time rules in place of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankContext {
    /// Unknown until the record has been inserted
    pub record_id: Option<i32>,
    pub trigger: RankTrigger,
    /// Clock reading taken once for the operation
    pub now: DateTime<FixedOffset>
}
