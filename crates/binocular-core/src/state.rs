//! 显式的应用状态对象（取代全局响应式 store）
//!
//! 由组合根持有，流水线通过 `MetricsSink` 写入，展示层只读。

use serde::Serialize;

use crate::trend::TrendHistory;
use crate::types::{ClinicalMetrics, FrameMetrics, TrendPoint};

/// 流水线的输出边界
pub trait MetricsSink {
    /// 每帧发布一次：绝对速度、取整后的对称指数，并追加趋势点
    fn publish_frame(&mut self, metrics: &FrameMetrics, timestamp: f64);

    /// 会话结束时整体替换临床结果；会话开始时以全空值复位
    fn publish_clinical(&mut self, clinical: &ClinicalMetrics);

    fn publish_recording(&mut self, recording: bool);
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisState {
    /// mm/s，非负
    pub velocity: f64,
    pub symmetry: u8,
    pub is_recording: bool,
    pub history: TrendHistory,
    /// 最近一次结束的会话的趋势，停止时冻结，下次开始时清空
    pub session_trend: Vec<TrendPoint>,
    pub clinical: ClinicalMetrics,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsSink for AnalysisState {
    fn publish_frame(&mut self, metrics: &FrameMetrics, timestamp: f64) {
        self.velocity = metrics.speed_mm_per_sec();
        self.symmetry = metrics.symmetry_percent;
        self.history.push(timestamp, metrics.velocity_mm_per_sec);
    }

    fn publish_clinical(&mut self, clinical: &ClinicalMetrics) {
        self.clinical = *clinical;
    }

    fn publish_recording(&mut self, recording: bool) {
        self.is_recording = recording;
        if recording {
            self.history.clear();
            self.session_trend.clear();
        } else {
            self.session_trend = self.history.to_vec();
        }
    }
}
