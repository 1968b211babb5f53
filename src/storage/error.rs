use rusqlite::ErrorCode;
use thiserror::Error;

use crate::{
    domain::track::TrackValidationError, media::MediaError, storage::query::QueryError,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid track: {0}")]
    InvalidTrack(#[from] TrackValidationError),

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("media store error: {0}")]
    Media(#[from] MediaError),

    #[error("genres encoding error: {0}")]
    Genres(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StorageError {
    /// true when the store refused a write because `id` or `slug` is already taken
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }
}
