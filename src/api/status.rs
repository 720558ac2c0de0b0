//! Runner Status API Handler
//!
//! Reports whether the runner has completed registration.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::status;

/// Response for GET /api/status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: &'static str,
    pub configured: bool,
}

/// GET /api/status
/// Presence of the marker file decides configured vs not_configured
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let configured = status::is_configured(&state.config.runner_dir).map_err(|e| {
        tracing::error!("Error getting status: {}", e);
        ApiError::new(format!("Error: {e}"))
    })?;

    Ok(Json(StatusResponse {
        success: true,
        status: if configured {
            "configured"
        } else {
            "not_configured"
        },
        configured,
    }))
}
