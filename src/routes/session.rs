use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::session::{LiveSnapshot, SessionInfo};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/toggle", post(toggle))
        .route("/recording", put(set_recording))
        .route("/reset", post(reset))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecordingRequest {
    pub recording: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub is_recording: bool,
    pub session: Option<SessionInfo>,
    pub sample_count: usize,
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub no_detection: u64,
    pub source_faults: u64,
}

impl From<LiveSnapshot> for SessionSummary {
    fn from(snapshot: LiveSnapshot) -> Self {
        Self {
            is_recording: snapshot.is_recording,
            sample_count: snapshot.sample_count(),
            session: snapshot.session,
            frames_processed: snapshot.frames_processed,
            frames_rejected: snapshot.frames_rejected,
            no_detection: snapshot.no_detection,
            source_faults: snapshot.source_faults,
        }
    }
}

async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    ok(SessionSummary::from(state.session().snapshot()))
}

async fn start(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.session().set_recording(true).await?))
}

async fn stop(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.session().set_recording(false).await?))
}

async fn toggle(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.session().toggle_recording().await?))
}

async fn set_recording(
    State(state): State<AppState>,
    Json(req): Json<SetRecordingRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.session().set_recording(req.recording).await?))
}

async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.session().reset().await?;
    Ok(ok(SessionSummary::from(state.session().snapshot())))
}
