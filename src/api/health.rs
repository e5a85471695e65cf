//! Health-check endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::AppState;

/// Fixed service identifier reported in the health payload.
pub const SERVICE_NAME: &str = "supporter-backend";

/// `GET /health` — always returns 200 OK.
///
/// Example response:
/// ```json
/// {"status": "ok", "env": "local", "service": "supporter-backend"}
/// ```
///
/// This endpoint has no dependencies and never blocks, making it safe to use
/// as a Docker / Kubernetes liveness probe and as the uptime-monitor target.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "env": state.env,
            "service": SERVICE_NAME,
        })),
    )
}
