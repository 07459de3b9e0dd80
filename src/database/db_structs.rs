use crate::model::{
    constants::{
        DEFAULT_BOOST_COLUMN, DEFAULT_ID_COLUMN, DEFAULT_RANK_COLUMN, DEFAULT_RANK_TIME_COLUMN, DEFAULT_TABLE
    },
    error::RankError
};
use serde::{Deserialize, Serialize};

/// Where a record's rank lives in the database.
///
/// Names are interpolated into SQL unquoted, so they are validated and folded
/// to lower case on construction, the same way PostgreSQL folds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankColumns {
    pub table: String,
    pub id: String,
    /// Receives the current temperature
    pub rank: String,
    /// Receives the time of the last temperature update
    pub rank_time: String,
    /// Optional per-record boost increment
    pub boost: String
}

impl RankColumns {
    pub fn new(table: &str, rank: &str, rank_time: &str, boost: &str) -> Result<Self, RankError> {
        let columns = RankColumns {
            table: table.to_ascii_lowercase(),
            id: DEFAULT_ID_COLUMN.to_string(),
            rank: rank.to_ascii_lowercase(),
            rank_time: rank_time.to_ascii_lowercase(),
            boost: boost.to_ascii_lowercase()
        };
        columns.validate()?;

        Ok(columns)
    }

    pub fn validate(&self) -> Result<(), RankError> {
        for name in [&self.table, &self.id, &self.rank, &self.rank_time, &self.boost] {
            if !is_identifier(name) {
                return Err(RankError::InvalidConfiguration(format!(
                    "'{}' is not a valid SQL identifier",
                    name
                )));
            }
        }

        if self.rank == self.rank_time {
            return Err(RankError::InvalidConfiguration(
                "rank and rank time must be stored in different columns".to_string()
            ));
        }

        Ok(())
    }
}

impl Default for RankColumns {
    fn default() -> Self {
        RankColumns {
            table: DEFAULT_TABLE.to_string(),
            id: DEFAULT_ID_COLUMN.to_string(),
            rank: DEFAULT_RANK_COLUMN.to_string(),
            rank_time: DEFAULT_RANK_TIME_COLUMN.to_string(),
            boost: DEFAULT_BOOST_COLUMN.to_string()
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false
    }
}

/// Storage type of the rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColumn {
    Double,
    Real
}

impl ScoreColumn {
    /// Maps an `information_schema.columns.data_type` value.
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type {
            "double precision" => Some(ScoreColumn::Double),
            "real" => Some(ScoreColumn::Real),
            _ => None
        }
    }
}

/// Storage type of the rank time column. Integer columns hold seconds
/// since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeColumn {
    TimestampTz,
    Timestamp,
    EpochInteger,
    EpochBigInt
}

impl TimeColumn {
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type {
            "timestamp with time zone" => Some(TimeColumn::TimestampTz),
            "timestamp without time zone" => Some(TimeColumn::Timestamp),
            "integer" => Some(TimeColumn::EpochInteger),
            "bigint" => Some(TimeColumn::EpochBigInt),
            _ => None
        }
    }
}

/// Storage type of the optional boost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostColumn {
    Double,
    Real,
    SmallInt,
    Integer,
    BigInt
}

impl BoostColumn {
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type {
            "double precision" => Some(BoostColumn::Double),
            "real" => Some(BoostColumn::Real),
            "smallint" => Some(BoostColumn::SmallInt),
            "integer" => Some(BoostColumn::Integer),
            "bigint" => Some(BoostColumn::BigInt),
            _ => None
        }
    }
}

/// Column types found in the database. `boost` is `None` when the table
/// has no boost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnKinds {
    pub score: ScoreColumn,
    pub time: TimeColumn,
    pub boost: Option<BoostColumn>
}

impl Default for ColumnKinds {
    /// The layout written by `DbClient::create_table`
    fn default() -> Self {
        ColumnKinds {
            score: ScoreColumn::Double,
            time: TimeColumn::TimestampTz,
            boost: Some(BoostColumn::Double)
        }
    }
}

/// A stored record as shown to operators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecord {
    pub id: i32,
    pub rank: f64,
    pub rank_time: chrono::DateTime<chrono::FixedOffset>,
    pub rank_boost: Option<f64>,
    /// Present-day temperature, not stored
    pub current_rank: f64
}
