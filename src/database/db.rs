use super::db_structs::{BoostColumn, ColumnKinds, RankColumns, RankedRecord, ScoreColumn, TimeColumn};
use crate::model::{store::RankStore, structures::rank_state::RankState};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use postgres_types::ToSql;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

type SqlParam = Box<dyn ToSql + Sync + Send>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Record {0} does not exist")]
    RecordNotFound(i32),

    #[error("Column {column} has unsupported type '{data_type}'")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("Timestamp {0} does not fit the rank time column")]
    TimestampOutOfRange(String)
}

/// PostgreSQL-backed [`RankStore`].
#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>,
    columns: Arc<RankColumns>,
    kinds: ColumnKinds
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str, columns: RankColumns) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        let mut db = DbClient {
            client: Arc::new(client),
            columns: Arc::new(columns),
            kinds: ColumnKinds::default()
        };
        db.kinds = db.describe_columns().await?;

        info!(
            table = %db.columns.table,
            has_boost_column = db.has_boost_column(),
            "Connected to database"
        );
        Ok(db)
    }

    pub fn columns(&self) -> &RankColumns {
        &self.columns
    }

    pub fn has_boost_column(&self) -> bool {
        self.kinds.boost.is_some()
    }

    /// Creates the rank table if it does not exist yet.
    /// An existing table is left as it is and its column types are re-read.
    pub async fn create_table(&mut self) -> Result<(), DbError> {
        let c = &self.columns;
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                {} SERIAL PRIMARY KEY, \
                {} DOUBLE PRECISION NOT NULL, \
                {} TIMESTAMPTZ NOT NULL, \
                {} DOUBLE PRECISION NULL)",
            c.table, c.id, c.rank, c.rank_time, c.boost
        );

        self.client.batch_execute(query.as_str()).await?;
        info!("Ensured the {} table exists", c.table);

        self.kinds = self.describe_columns().await?;
        Ok(())
    }

    /// Inserts a record whose rank was produced by
    /// [`RankUpdater::initialize_on_create`](crate::model::rank_updater::RankUpdater::initialize_on_create),
    /// returning its primary key.
    pub async fn insert_record(&self, state: RankState, boost: Option<f64>) -> Result<i32, DbError> {
        let c = &self.columns;
        let score = self.score_param(state.score);
        let time = self.time_param(state.recorded_at)?;

        let row = match self.kinds.boost {
            Some(kind) => {
                let query = format!(
                    "INSERT INTO {} ({}, {}, {}) VALUES ($1, $2, $3) RETURNING {}",
                    c.table, c.rank, c.rank_time, c.boost, c.id
                );
                let boost = boost_param(kind, boost);
                let values: &[&(dyn ToSql + Sync)] = &[&*score, &*time, &*boost];
                self.client.query_one(query.as_str(), values).await?
            }
            None => {
                let query = format!(
                    "INSERT INTO {} ({}, {}) VALUES ($1, $2) RETURNING {}",
                    c.table, c.rank, c.rank_time, c.id
                );
                let values: &[&(dyn ToSql + Sync)] = &[&*score, &*time];
                self.client.query_one(query.as_str(), values).await?
            }
        };

        let id: i32 = row.try_get(0)?;
        debug!(record_id = id, score = state.score, "Inserted record");

        Ok(id)
    }

    /// Fetches a record along with its present-day temperature,
    /// computed by `current_rank`.
    pub async fn get_record(
        &self,
        record_id: i32,
        current_rank: impl Fn(&RankState) -> f64
    ) -> Result<Option<RankedRecord>, DbError> {
        let Some(state) = self.read_rank(record_id).await? else {
            return Ok(None);
        };

        Ok(Some(RankedRecord {
            id: record_id,
            rank: state.score,
            rank_time: state.recorded_at,
            rank_boost: self.boost_value(record_id).await?,
            current_rank: current_rank(&state)
        }))
    }

    /// Reads the rank column types from `information_schema`.
    /// A missing table describes as the layout `create_table` would write.
    async fn describe_columns(&self) -> Result<ColumnKinds, DbError> {
        let rows = self
            .client
            .query(
                "SELECT column_name::text, data_type::text FROM information_schema.columns \
                WHERE table_name::text = lower($1)",
                &[&self.columns.table]
            )
            .await?;

        if rows.is_empty() {
            return Ok(ColumnKinds::default());
        }

        let mut types: HashMap<String, String> = HashMap::new();
        for row in rows {
            types.insert(row.try_get(0)?, row.try_get(1)?);
        }

        let c = &self.columns;
        let score = column_kind(&types, &c.rank, ScoreColumn::from_data_type)?;
        let time = column_kind(&types, &c.rank_time, TimeColumn::from_data_type)?;
        let boost = match types.contains_key(&c.boost.to_ascii_lowercase()) {
            true => Some(column_kind(&types, &c.boost, BoostColumn::from_data_type)?),
            false => None
        };

        Ok(ColumnKinds { score, time, boost })
    }

    fn state_from_row(&self, row: &Row) -> Result<RankState, DbError> {
        let score = match self.kinds.score {
            ScoreColumn::Double => row.try_get::<_, f64>(0)?,
            ScoreColumn::Real => row.try_get::<_, f32>(0)? as f64
        };

        let recorded_at = match self.kinds.time {
            TimeColumn::TimestampTz => row.try_get::<_, DateTime<FixedOffset>>(1)?,
            TimeColumn::Timestamp => row.try_get::<_, NaiveDateTime>(1)?.and_utc().fixed_offset(),
            TimeColumn::EpochInteger => from_epoch(row.try_get::<_, i32>(1)? as i64)?,
            TimeColumn::EpochBigInt => from_epoch(row.try_get::<_, i64>(1)?)?
        };

        Ok(RankState { score, recorded_at })
    }

    fn score_param(&self, score: f64) -> SqlParam {
        match self.kinds.score {
            ScoreColumn::Double => Box::new(score),
            ScoreColumn::Real => Box::new(score as f32)
        }
    }

    fn time_param(&self, time: DateTime<FixedOffset>) -> Result<SqlParam, DbError> {
        let param: SqlParam = match self.kinds.time {
            TimeColumn::TimestampTz => Box::new(time),
            TimeColumn::Timestamp => Box::new(time.naive_utc()),
            TimeColumn::EpochInteger => Box::new(
                i32::try_from(time.timestamp()).map_err(|_| DbError::TimestampOutOfRange(time.to_rfc3339()))?
            ),
            TimeColumn::EpochBigInt => Box::new(time.timestamp())
        };

        Ok(param)
    }

    // Access the underlying Client
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}

fn column_kind<K>(
    types: &HashMap<String, String>,
    column: &str,
    parse: impl Fn(&str) -> Option<K>
) -> Result<K, DbError> {
    let data_type = types.get(&column.to_ascii_lowercase()).map(String::as_str).unwrap_or("missing");

    parse(data_type).ok_or_else(|| DbError::UnsupportedColumnType {
        column: column.to_string(),
        data_type: data_type.to_string()
    })
}

fn boost_param(kind: BoostColumn, boost: Option<f64>) -> SqlParam {
    match kind {
        BoostColumn::Double => Box::new(boost),
        BoostColumn::Real => Box::new(boost.map(|b| b as f32)),
        BoostColumn::SmallInt => Box::new(boost.map(|b| b as i16)),
        BoostColumn::Integer => Box::new(boost.map(|b| b as i32)),
        BoostColumn::BigInt => Box::new(boost.map(|b| b as i64))
    }
}

fn from_epoch(seconds: i64) -> Result<DateTime<FixedOffset>, DbError> {
    DateTime::from_timestamp(seconds, 0)
        .map(|t| t.fixed_offset())
        .ok_or_else(|| DbError::TimestampOutOfRange(seconds.to_string()))
}

impl RankStore for DbClient {
    type Error = DbError;

    async fn read_rank(&self, record_id: i32) -> Result<Option<RankState>, DbError> {
        let c = &self.columns;
        let query = format!("SELECT {}, {} FROM {} WHERE {} = $1", c.rank, c.rank_time, c.table, c.id);
        let row = self.client.query_opt(query.as_str(), &[&record_id]).await?;

        row.map(|r| self.state_from_row(&r)).transpose()
    }

    async fn write_rank(&self, record_id: i32, state: RankState) -> Result<(), DbError> {
        let c = &self.columns;
        let query = format!("UPDATE {} SET {} = $1, {} = $2 WHERE {} = $3", c.table, c.rank, c.rank_time, c.id);
        let score = self.score_param(state.score);
        let time = self.time_param(state.recorded_at)?;
        let values: &[&(dyn ToSql + Sync)] = &[&*score, &*time, &record_id];

        let updated = self.client.execute(query.as_str(), values).await?;
        if updated == 0 {
            return Err(DbError::RecordNotFound(record_id));
        }

        Ok(())
    }

    async fn boost_value(&self, record_id: i32) -> Result<Option<f64>, DbError> {
        let Some(kind) = self.kinds.boost else {
            return Ok(None);
        };

        let c = &self.columns;
        let query = format!("SELECT {} FROM {} WHERE {} = $1", c.boost, c.table, c.id);
        let Some(row) = self.client.query_opt(query.as_str(), &[&record_id]).await? else {
            return Ok(None);
        };

        Ok(match kind {
            BoostColumn::Double => row.try_get::<_, Option<f64>>(0)?,
            BoostColumn::Real => row.try_get::<_, Option<f32>>(0)?.map(f64::from),
            BoostColumn::SmallInt => row.try_get::<_, Option<i16>>(0)?.map(f64::from),
            BoostColumn::Integer => row.try_get::<_, Option<i32>>(0)?.map(f64::from),
            BoostColumn::BigInt => row.try_get::<_, Option<i64>>(0)?.map(|b| b as f64)
        })
    }
}
