//! 帧输入：浏览器端检测出的虹膜中心，或整张脸的关键点集合

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use binocular_core::{FrameReport, Landmark, TrackingFrame};

use crate::response::{ok, AppError};
use crate::session::BatchOutcome;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/frames", post(submit_frames))
        .route("/landmarks", post(submit_landmarks))
}

/// 单帧或批量帧；批量按数组顺序处理
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FramesPayload {
    Batch { frames: Vec<TrackingFrame> },
    Single(TrackingFrame),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarksRequest {
    pub timestamp: f64,
    #[serde(alias = "videoWidth")]
    pub width: u32,
    #[serde(alias = "videoHeight")]
    pub height: u32,
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarksOutcome {
    pub detected: bool,
    pub report: Option<FrameReport>,
}

async fn submit_frames(
    State(state): State<AppState>,
    Json(payload): Json<FramesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (frames, single) = match payload {
        FramesPayload::Single(frame) => (vec![frame], true),
        FramesPayload::Batch { frames } => (frames, false),
    };

    if frames.is_empty() {
        return Err(AppError::bad_request("EMPTY_BATCH", "frames must not be empty"));
    }
    let max = state.config().limits.max_frames_per_batch;
    if frames.len() > max {
        return Err(AppError::payload_too_large(&format!(
            "at most {max} frames per request, got {}",
            frames.len()
        )));
    }

    let outcome: BatchOutcome = state.session().submit_frames(frames).await?;
    if single {
        if let Some(rejection) = outcome.rejected.first() {
            return Err(AppError::bad_request(rejection.code, &rejection.message));
        }
    }
    Ok(ok(outcome))
}

/// 关键点不足以构成虹膜拓扑时按"未检测到人脸"处理，不改变任何状态
async fn submit_landmarks(
    State(state): State<AppState>,
    Json(req): Json<LandmarksRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(frame) =
        TrackingFrame::from_face_landmarks(req.timestamp, &req.landmarks, req.width, req.height)
    else {
        tracing::debug!(
            landmark_count = req.landmarks.len(),
            "Landmark set has no iris topology"
        );
        return Ok(ok(LandmarksOutcome {
            detected: false,
            report: None,
        }));
    };

    let outcome = state.session().submit_frames(vec![frame]).await?;
    if let Some(rejection) = outcome.rejected.first() {
        return Err(AppError::bad_request(rejection.code, &rejection.message));
    }
    Ok(ok(LandmarksOutcome {
        detected: true,
        report: outcome.latest,
    }))
}
