use thiserror::Error;

use crate::services::StoreError;

/// Errors surfaced by the matching core and the service around it
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type MatchResult<T> = Result<T, MatchError>;
