//! 关键点来源与单次轮询
//!
//! 帧循环按固定节奏调用 `poll_once`；检测器的单帧异常只记录日志，
//! 不会中断循环，下一次调度照常进行。

use std::collections::VecDeque;

use crate::error::SourceError;
use crate::pipeline::{FrameReport, VisionPipeline};
use crate::state::MetricsSink;
use crate::types::TrackingFrame;

/// 外部人脸关键点检测器的抽象；`Ok(None)` 表示本帧没有检测到人脸
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Option<TrackingFrame>, SourceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Processed(FrameReport),
    NoDetection,
    Rejected,
    Faulted,
}

pub fn poll_once<S, K>(source: &mut S, pipeline: &mut VisionPipeline, sink: &mut K) -> PollOutcome
where
    S: LandmarkSource + ?Sized,
    K: MetricsSink,
{
    match source.next_frame() {
        Ok(Some(frame)) => match pipeline.process_frame(&frame, sink) {
            Ok(report) => PollOutcome::Processed(report),
            Err(e) => {
                tracing::debug!(error = %e, "Dropped malformed tracking frame");
                PollOutcome::Rejected
            }
        },
        Ok(None) => PollOutcome::NoDetection,
        Err(e) => {
            tracing::warn!(error = %e, "Landmark source fault, skipping frame");
            PollOutcome::Faulted
        }
    }
}

/// 回放预先录好的检测序列，`None` 为无人脸的空档
#[derive(Debug, Default)]
pub struct ReplaySource {
    queue: VecDeque<Result<Option<TrackingFrame>, SourceError>>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: impl IntoIterator<Item = Option<TrackingFrame>>) -> Self {
        Self {
            queue: frames.into_iter().map(Ok).collect(),
        }
    }

    pub fn push(&mut self, detection: Result<Option<TrackingFrame>, SourceError>) {
        self.queue.push_back(detection);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<TrackingFrame>, SourceError> {
        self.queue.pop_front().unwrap_or(Ok(None))
    }
}
