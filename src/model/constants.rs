// Rank defaults
pub const DEFAULT_INITIAL: f64 = 1000.0;
pub const DEFAULT_BOOST: f64 = 0.0;
pub const DEFAULT_COOLING_RATE: f64 = 150.0;
pub const SECONDS_PER_HOUR: i64 = 3600;
// Persistence mapping defaults
pub const DEFAULT_TABLE: &str = "ranked_records";
pub const DEFAULT_ID_COLUMN: &str = "id";
pub const DEFAULT_RANK_COLUMN: &str = "rank";
pub const DEFAULT_RANK_TIME_COLUMN: &str = "rank_time";
pub const DEFAULT_BOOST_COLUMN: &str = "rank_boost";
