use wasm_bindgen::prelude::*;

use binocular_core::FrameReport;

/// 单帧处理结果
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct FrameResult {
    /// 本帧是否被流水线接受（false = 帧非法，状态未变）
    pub accepted: bool,
    /// 集合速度绝对值（mm/s）
    pub velocity: f64,
    /// 带符号速度，正 = 发散，负 = 集合
    #[wasm_bindgen(js_name = "signedVelocity")]
    pub signed_velocity: f64,
    /// 对称指数 0-100
    pub symmetry: u8,
    /// 当前瞳距（mm）
    #[wasm_bindgen(js_name = "pdMm")]
    pub pd_mm: f64,
    /// 是否写入了会话缓冲
    pub recorded: bool,
}

impl FrameResult {
    pub(crate) fn rejected() -> Self {
        Self {
            accepted: false,
            velocity: 0.0,
            signed_velocity: 0.0,
            symmetry: 0,
            pd_mm: 0.0,
            recorded: false,
        }
    }
}

impl From<FrameReport> for FrameResult {
    fn from(report: FrameReport) -> Self {
        Self {
            accepted: true,
            velocity: report.metrics.speed_mm_per_sec(),
            signed_velocity: report.metrics.velocity_mm_per_sec,
            symmetry: report.metrics.symmetry_percent,
            pd_mm: report.pd_mm,
            recorded: report.recorded,
        }
    }
}
