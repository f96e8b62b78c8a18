use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use uuid::Uuid;

use binocular_core::constants::TREND_HISTORY_CAPACITY;
use binocular_core::{ClinicalMetrics, TrendPoint};

use crate::response::ok;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/live", get(live))
        .route("/history", get(history))
        .route("/clinical", get(clinical))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetrics {
    /// mm/s
    pub velocity: f64,
    pub symmetry: u8,
    pub is_recording: bool,
    pub sample_count: usize,
    pub latest: Option<TrendPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub capacity: usize,
    /// 最近的逐帧趋势，包含会话外的帧
    pub points: Vec<TrendPoint>,
    /// 最近一次结束的会话的趋势，直到下次开始录制前保持不变
    pub session_points: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalView {
    pub session_id: Option<Uuid>,
    pub computed: bool,
    pub metrics: ClinicalMetrics,
}

async fn live(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session().snapshot();
    ok(LiveMetrics {
        velocity: snapshot.velocity,
        symmetry: snapshot.symmetry,
        is_recording: snapshot.is_recording,
        sample_count: snapshot.sample_count(),
        latest: snapshot.history.last().copied(),
    })
}

async fn history(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session().snapshot();
    ok(HistoryView {
        capacity: TREND_HISTORY_CAPACITY,
        points: snapshot.history,
        session_points: snapshot.session_trend,
    })
}

async fn clinical(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session().snapshot();
    ok(ClinicalView {
        session_id: snapshot.session.map(|s| s.id),
        computed: !snapshot.clinical.is_unset(),
        metrics: snapshot.clinical,
    })
}
