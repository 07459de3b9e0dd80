//! Newton's-law-of-cooling rank engine.
//!
//! A record's temperature is set when it is created and cools exponentially
//! from then on. Heating a record cools its stored temperature up to now,
//! adds the increment and records the new temperature with the current time.

pub mod clock;
pub mod config;
pub mod constants;
pub mod decay;
pub mod error;
pub mod rank_updater;
pub mod rules;
pub mod store;
pub mod structures;

pub use self::{
    config::RankConfig,
    error::RankError,
    rank_updater::RankUpdater,
    rules::{ScoreRule, TimeRule},
    store::{MemoryStore, RankStore},
    structures::rank_state::RankState
};
