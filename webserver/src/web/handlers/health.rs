//! Liveness and health endpoints

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use orchestrator::{ProcessInvoker, WorkspaceManager};
use shared::HealthResponse;

use crate::state::WebServerState;

pub const LIVENESS_TEXT: &str = "Video download relay is running!";

/// `GET /`
pub async fn index() -> &'static str {
    LIVENESS_TEXT
}

/// `GET /health`
pub async fn health<W, P>(State(state): State<Arc<WebServerState<W, P>>>) -> Json<HealthResponse>
where
    W: WorkspaceManager + 'static,
    P: ProcessInvoker + 'static,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.get_uptime_seconds(),
        active_downloads: state.active_downloads(),
    })
}
