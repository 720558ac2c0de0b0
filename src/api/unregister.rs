//! Runner Unregister API Handler
//!
//! Triggers de-registration of the runner via its own configuration script.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::unregister;

/// Response for a successful POST /api/unregister
#[derive(Debug, Serialize)]
pub struct UnregisterResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/unregister
/// Runs `config.sh remove` as the runner user, bounded by the configured
/// timeout. All failure kinds surface as HTTP 500 with a message.
pub async fn unregister_runner(
    State(state): State<AppState>,
) -> ApiResult<Json<UnregisterResponse>> {
    tracing::info!("Unregister request received");

    unregister::unregister(&state.config).await?;

    Ok(Json(UnregisterResponse {
        success: true,
        message: "Runner unregistered successfully. You may need to restart the add-on to register again.",
    }))
}
