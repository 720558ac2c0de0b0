//! API Module
//!
//! HTTP API layer for the control server: the static control page plus the
//! status and unregister endpoints.

pub mod error;
pub mod index;
pub mod status;
pub mod unregister;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Create the main API router with all endpoints
pub fn create_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/api/status", get(status::get_status))
        .route("/api/unregister", post(unregister::unregister_runner))
        .with_state(AppState { config })
        .layer(TraceLayer::new_for_http())
}
