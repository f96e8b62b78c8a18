//! 会话样本缓冲
//!
//! 仅在录制期间追加样本；每次开始新会话时清空并复位基线 PD 标记。
//! 临床汇总需要整段会话，所以这里不设容量上限。

use crate::types::Sample;

#[derive(Debug, Default)]
pub struct SessionBuffer {
    recording: bool,
    samples: Vec<Sample>,
    baseline_pd: Option<f64>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// 开始新会话：清空样本，复位基线
    pub fn start(&mut self) {
        self.recording = true;
        self.samples.clear();
        self.baseline_pd = None;
    }

    /// 结束会话并交出整段样本
    pub fn stop(&mut self) -> Vec<Sample> {
        self.recording = false;
        std::mem::take(&mut self.samples)
    }

    /// 未录制时为空操作，返回是否写入
    pub fn push(&mut self, sample: Sample) -> bool {
        if !self.recording {
            return false;
        }
        if self.baseline_pd.is_none() {
            self.baseline_pd = Some(sample.pd_mm);
        }
        self.samples.push(sample);
        true
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 会话首个样本的 PD，仅供展示；临床汇总会重新计算基线
    pub fn baseline_pd(&self) -> Option<f64> {
        self.baseline_pd
    }
}
