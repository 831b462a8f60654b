//! Health check endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /api/health — liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/health/detailed — liveness plus hub counters
pub async fn detailed_health(State(state): State<AppState>) -> Json<Value> {
    let connections = state.hub.connection_count().await;
    Json(json!({
        "status": "ok",
        "realtime": { "connections": connections },
    }))
}
