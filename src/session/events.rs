use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use binocular_core::{ClinicalMetrics, FrameReport};

/// 推送给实时订阅者的事件
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnalysisEvent {
    Frame {
        timestamp: f64,
        velocity: f64,
        signed_velocity: f64,
        symmetry: u8,
        pd_mm: f64,
        recorded: bool,
    },
    SessionStarted {
        session_id: Uuid,
        started_at: DateTime<Utc>,
    },
    SessionStopped {
        session_id: Uuid,
        stopped_at: DateTime<Utc>,
        sample_count: usize,
        clinical: ClinicalMetrics,
    },
}

impl AnalysisEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Frame { .. } => "frame",
            Self::SessionStarted { .. } => "session_started",
            Self::SessionStopped { .. } => "session_stopped",
        }
    }
}

impl From<&FrameReport> for AnalysisEvent {
    fn from(report: &FrameReport) -> Self {
        Self::Frame {
            timestamp: report.timestamp,
            velocity: report.metrics.speed_mm_per_sec(),
            signed_velocity: report.metrics.velocity_mm_per_sec,
            symmetry: report.metrics.symmetry_percent,
            pd_mm: report.pd_mm,
            recorded: report.recorded,
        }
    }
}
