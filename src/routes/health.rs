use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let snapshot = state.session().snapshot();
    Json(serde_json::json!({
        "status": if state.session().is_running() { "ok" } else { "degraded" },
        "uptimeSecs": state.uptime_secs(),
        "session": {
            "running": state.session().is_running(),
            "recording": snapshot.is_recording,
            "framesProcessed": snapshot.frames_processed,
        },
        "simulator": state.config().simulator.enabled,
        "sseConnections": state.sse_connections(),
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// worker 退出后不再接受流量
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.session().is_running() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
