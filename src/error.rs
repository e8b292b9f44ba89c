use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Outcome taxonomy for the registration/attendance/feedback pipeline.
///
/// Callers must be able to tell "not found" apart from "not authorized" apart
/// from "business rule violated", so every operation returns one of these
/// instead of a flattened storage error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::Unauthorized(_) => StatusCode::FORBIDDEN,
            PipelineError::InvalidState(_) => StatusCode::CONFLICT,
            PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage and internal failures are logged here; their details stay
        // out of the response body.
        let body = match &self {
            PipelineError::Internal(msg) => {
                warn!("Internal failure: {}", msg);
                json!({ "error": "internal error" })
            }
            PipelineError::Database(e) => {
                warn!("Storage failure: {}", e);
                json!({ "error": "internal error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
