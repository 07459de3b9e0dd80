pub mod rank_context;
pub mod rank_state;
pub mod rank_trigger;
