//! 逐帧处理流水线
//!
//! 单写者：滤波状态、样本缓冲和发布的指标只由 `process_frame` 与
//! `set_recording` 修改。调度方式（定时器、真实帧回调、测试喂帧）与算法解耦。

use serde::Serialize;

use crate::buffer::SessionBuffer;
use crate::clinical;
use crate::error::FrameError;
use crate::filter::FilterState;
use crate::metrics;
use crate::state::MetricsSink;
use crate::types::{ClinicalMetrics, FrameMetrics, Sample, TrackingFrame};

/// 单帧处理结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub timestamp: f64,
    pub pd_mm: f64,
    pub metrics: FrameMetrics,
    pub recorded: bool,
}

/// 录制状态切换的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Unchanged,
    Started,
    Stopped {
        sample_count: usize,
        clinical: ClinicalMetrics,
    },
}

#[derive(Debug, Default)]
pub struct VisionPipeline {
    filter: Option<FilterState>,
    buffer: SessionBuffer,
    frames_processed: u64,
    frames_rejected: u64,
}

impl VisionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_state(&self) -> Option<&FilterState> {
        self.filter.as_ref()
    }

    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected
    }

    /// 处理一帧：校验 → 滤波 → 指标 → 录制中则入缓冲 → 发布
    ///
    /// 非法帧不改变任何状态，等同于未检测到人脸。
    pub fn process_frame(
        &mut self,
        frame: &TrackingFrame,
        sink: &mut impl MetricsSink,
    ) -> Result<FrameReport, FrameError> {
        if let Err(e) = frame.validate() {
            self.frames_rejected += 1;
            return Err(e);
        }

        let step = metrics::advance(self.filter.as_ref(), frame);
        self.filter = Some(step.state);
        self.frames_processed += 1;

        let recorded = self.buffer.push(Sample {
            timestamp: frame.timestamp,
            pd_mm: step.pd_mm,
            velocity_mm_per_sec: step.metrics.speed_mm_per_sec(),
            symmetry_percent: step.metrics.symmetry_percent,
            left_px: step.state.last_left_px,
            right_px: step.state.last_right_px,
        });

        sink.publish_frame(&step.metrics, frame.timestamp);

        Ok(FrameReport {
            timestamp: frame.timestamp,
            pd_mm: step.pd_mm,
            metrics: step.metrics,
            recorded,
        })
    }

    /// 观察录制标志的跳变：false→true 复位会话，true→false 汇总一次临床结果
    pub fn set_recording(&mut self, recording: bool, sink: &mut impl MetricsSink) -> Transition {
        match (self.buffer.is_recording(), recording) {
            (false, true) => {
                self.filter = None;
                self.buffer.start();
                sink.publish_recording(true);
                sink.publish_clinical(&ClinicalMetrics::unset());
                tracing::info!("Recording session started");
                Transition::Started
            }
            (true, false) => {
                let samples = self.buffer.stop();
                let clinical = clinical::aggregate(&samples);
                sink.publish_recording(false);
                sink.publish_clinical(&clinical);
                tracing::info!(
                    sample_count = samples.len(),
                    computed = !clinical.is_unset(),
                    "Recording session stopped"
                );
                Transition::Stopped {
                    sample_count: samples.len(),
                    clinical,
                }
            }
            _ => Transition::Unchanged,
        }
    }

    pub fn toggle_recording(&mut self, sink: &mut impl MetricsSink) -> Transition {
        let next = !self.buffer.is_recording();
        self.set_recording(next, sink)
    }
}
