//! Control Page Handler
//!
//! Serves the bundled HTML control page.

use axum::response::Html;

/// GET /
/// The main page, compiled into the binary
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
