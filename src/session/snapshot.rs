use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use binocular_core::{ClinicalMetrics, TrendPoint};

/// 一次录制会话的元信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub sample_count: usize,
}

impl SessionInfo {
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            stopped_at: None,
            sample_count: 0,
        }
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.stopped_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

/// worker 每次状态变化后发布的只读快照
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub velocity: f64,
    pub symmetry: u8,
    pub is_recording: bool,
    /// 当前会话，未录制时为最近一次会话
    pub session: Option<SessionInfo>,
    pub history: Vec<TrendPoint>,
    /// 最近一次结束的会话的趋势
    pub session_trend: Vec<TrendPoint>,
    pub clinical: ClinicalMetrics,
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub no_detection: u64,
    pub source_faults: u64,
}

impl LiveSnapshot {
    pub fn sample_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.sample_count)
    }
}
