//! API Error Handling
//!
//! Converts service failures into the wire shape the control page expects.
//! Every failure is HTTP 500 with `{"success": false, "message": ...}`;
//! kinds are distinguished only by the message text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::unregister::UnregisterError;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<UnregisterError> for ApiError {
    fn from(err: UnregisterError) -> Self {
        match err {
            UnregisterError::ConfigUnreadable(detail) => {
                tracing::error!("Error reading options file: {}", detail);
                ApiError::new("Failed to read runner token from configuration")
            }
            UnregisterError::CommandTimeout(_) => {
                tracing::error!("Unregister command timed out");
                ApiError::new("Unregister command timed out")
            }
            UnregisterError::CommandFailed { exit_code, stderr } => {
                tracing::error!("Unregister failed with exit code {}: {}", exit_code, stderr);
                ApiError::new(format!("Failed to unregister runner: {stderr}"))
            }
            UnregisterError::Unexpected(err) => {
                tracing::error!("Error unregistering runner: {}", err);
                ApiError::new(format!("Error: {err}"))
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
