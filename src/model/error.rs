use std::convert::Infallible;
use thiserror::Error;

/// Errors raised by the rank engine.
///
/// `E` is the error type of the [`RankStore`](crate::model::store::RankStore)
/// the operation ran against. Pure operations use the default, [`Infallible`].
#[derive(Debug, Error)]
pub enum RankError<E = Infallible> {
    #[error("Invalid rank configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid rank operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Store(E)
}

impl RankError {
    /// Lifts an error raised without a store into the error space of a store
    /// operation.
    pub fn with_store<E>(self) -> RankError<E> {
        match self {
            RankError::InvalidConfiguration(msg) => RankError::InvalidConfiguration(msg),
            RankError::InvalidOperation(msg) => RankError::InvalidOperation(msg),
            RankError::InvalidTimestamp(msg) => RankError::InvalidTimestamp(msg),
            RankError::Store(never) => match never {}
        }
    }
}

impl<E> RankError<E> {
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, RankError::InvalidOperation(_))
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, RankError::InvalidConfiguration(_))
    }
}
