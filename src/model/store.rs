use crate::model::structures::rank_state::RankState;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, PoisonError}
};
use thiserror::Error;

/// Persistence seam for the rank engine.
///
/// Implementations own the record; the engine only ever reads and writes the
/// (score, timestamp) pair and looks up a stored boost value.
pub trait RankStore {
    type Error: std::error::Error;

    /// Returns `None` when the record has not been created yet.
    fn read_rank(&self, record_id: i32) -> impl Future<Output = Result<Option<RankState>, Self::Error>> + Send;

    /// Writes both fields in a single update. No other field may be touched.
    fn write_rank(&self, record_id: i32, state: RankState) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// The record's own boost increment, if it carries one.
    fn boost_value(&self, record_id: i32) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send;
}

#[derive(Debug, Error, PartialEq)]
pub enum MemoryStoreError {
    #[error("Record {0} does not exist")]
    RecordNotFound(i32),

    #[error("Memory store lock poisoned")]
    Poisoned
}

impl<T> From<PoisonError<T>> for MemoryStoreError {
    fn from(_: PoisonError<T>) -> Self {
        MemoryStoreError::Poisoned
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MemoryRecord {
    state: RankState,
    boost: Option<f64>
}

/// In-process [`RankStore`]. Writes are last-write-wins, exactly like an
/// unguarded row update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<i32, MemoryRecord>>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly initialized record.
    pub fn insert(&self, record_id: i32, state: RankState) -> Result<(), MemoryStoreError> {
        self.insert_with_boost(record_id, state, None)
    }

    pub fn insert_with_boost(
        &self,
        record_id: i32,
        state: RankState,
        boost: Option<f64>
    ) -> Result<(), MemoryStoreError> {
        self.records
            .lock()?
            .insert(record_id, MemoryRecord { state, boost });

        Ok(())
    }

    pub fn get(&self, record_id: i32) -> Result<Option<RankState>, MemoryStoreError> {
        Ok(self.records.lock()?.get(&record_id).map(|r| r.state))
    }

    pub fn len(&self) -> Result<usize, MemoryStoreError> {
        Ok(self.records.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MemoryStoreError> {
        Ok(self.len()? == 0)
    }
}

impl RankStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn read_rank(&self, record_id: i32) -> Result<Option<RankState>, Self::Error> {
        self.get(record_id)
    }

    async fn write_rank(&self, record_id: i32, state: RankState) -> Result<(), Self::Error> {
        let mut records = self.records.lock()?;
        let record = records
            .get_mut(&record_id)
            .ok_or(MemoryStoreError::RecordNotFound(record_id))?;

        record.state = state;
        Ok(())
    }

    async fn boost_value(&self, record_id: i32) -> Result<Option<f64>, Self::Error> {
        Ok(self.records.lock()?.get(&record_id).and_then(|r| r.boost))
    }
}
