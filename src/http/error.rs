//! HTTP error responses and their mapping from store errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::JotterError;

/// Errors a handler can return, each tied to one status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid payload")]
    InvalidPayload { reason: String },

    #[error("Not found")]
    NotFound { id: i64 },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidPayload { reason } => tracing::debug!(%reason, "rejected payload"),
            ApiError::NotFound { id } => tracing::debug!(id, "note not found"),
            ApiError::Storage { message } => tracing::error!(%message, "storage failure"),
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

impl From<JotterError> for ApiError {
    fn from(err: JotterError) -> Self {
        match err {
            JotterError::NoteNotFound(id) => ApiError::NotFound { id },
            JotterError::Validation(reason) => ApiError::InvalidPayload { reason },
            JotterError::Io(e) => ApiError::Storage {
                message: format!("IO error: {}", e),
            },
            JotterError::Json(e) => ApiError::Storage {
                message: format!("JSON error: {}", e),
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidPayload {
            reason: err.to_string(),
        }
    }
}
