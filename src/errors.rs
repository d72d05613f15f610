use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The lead store cannot be reached. Fatal to the whole invocation.
    RepositoryUnavailable(String),
    /// A single row could not be coerced into a `Lead`. The row is skipped
    /// and counted, never fatal to the batch.
    DataIntegrity(String),
    /// An internal consistency check failed (e.g. country shares not summing
    /// to 1). Indicates a bug and must not be silently corrected.
    InvariantViolation(String),
    /// A caller-supplied parameter is out of contract (e.g. a top-N limit
    /// above the maximum). Rejected before any computation runs.
    Usage(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RepositoryUnavailable(msg) => write!(f, "Lead store unavailable: {}", msg),
            AppError::DataIntegrity(msg) => write!(f, "Data integrity error: {}", msg),
            AppError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            AppError::Usage(msg) => write!(f, "Usage error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::RepositoryUnavailable(msg) => {
                tracing::error!("Lead store unavailable: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Lead store unavailable: {}", msg),
                )
            }
            AppError::DataIntegrity(msg) => {
                tracing::error!("Data integrity error surfaced to caller: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Data integrity error".to_string(),
                )
            }
            AppError::InvariantViolation(msg) => {
                tracing::error!("Invariant violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Invariant violation: {}", msg),
                )
            }
            AppError::Usage(msg) => {
                tracing::warn!("Usage error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    /// Converts a `sqlx::Error` into an `AppError`.
    ///
    /// Every database failure during a read is treated as the store being
    /// unreachable for this invocation; the caller decides whether to retry.
    fn from(err: sqlx::Error) -> Self {
        AppError::RepositoryUnavailable(err.to_string())
    }
}
