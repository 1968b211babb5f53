use rouille::Response;
use serde::Serialize;

use crate::storage::error::StorageError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    PayloadTooLarge(String),
    /// the media host failed
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_uniqueness_violation() {
            return ApiError::Conflict("a track with this slug already exists".into());
        }

        match err {
            StorageError::InvalidTrack(e) => ApiError::BadRequest(e.to_string()),

            StorageError::InvalidQuery(e) => ApiError::BadRequest(e.to_string()),

            StorageError::Media(e) => {
                log::error!("media store failure: {e}");
                ApiError::BadGateway("media store request failed".into())
            }

            StorageError::Database(_) | StorageError::Genres(_) | StorageError::Internal(_) => {
                log::error!("internal error: {err}");
                ApiError::Internal("internal server error".into())
            }
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::BadGateway(_) => 502,
            ApiError::Internal(_) => 500,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn into_response(self) -> Response {
        Response::json(&ErrorBody {
            error: self.message(),
        })
        .with_status_code(self.status_code())
    }
}
