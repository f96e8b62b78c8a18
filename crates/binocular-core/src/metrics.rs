//! 单帧指标引擎
//!
//! 输入平滑后的双眼像素坐标与上一帧滤波状态，输出瞳距（PD）、
//! 集合速度与左右运动对称指数。纯数值计算，没有错误路径；
//! 帧尺寸等输入合法性由调用方（`TrackingFrame::validate`）保证。

use crate::constants::{MOVEMENT_THRESHOLD_MM_PER_SEC, PIXEL_TO_MM};
use crate::filter::{smooth, FilterState};
use crate::types::{FrameMetrics, TrackingFrame};

/// 推进一帧后的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub state: FilterState,
    pub metrics: FrameMetrics,
    pub pd_mm: f64,
}

pub fn pd_mm(left_px: f64, right_px: f64) -> f64 {
    (left_px - right_px).abs() * PIXEL_TO_MM
}

/// 对称指数：两眼等速 = 100，仅单眼运动 = 0，整体静止按约定记 100
pub fn symmetry_index(left_velocity: f64, right_velocity: f64) -> f64 {
    let speed_left = left_velocity.abs();
    let speed_right = right_velocity.abs();
    let total = speed_left + speed_right;
    if total > MOVEMENT_THRESHOLD_MM_PER_SEC {
        (1.0 - (speed_left - speed_right).abs() / total) * 100.0
    } else {
        100.0
    }
}

/// 用当前帧推进滤波状态并计算该帧指标
///
/// 没有上一帧时速度与对称指数均为 0；Δt ≤ 0 时速度为 0、对称指数为 100。
/// 两种情况下状态都照常推进。
pub fn advance(prev: Option<&FilterState>, frame: &TrackingFrame) -> FrameStep {
    let smoothed = smooth(prev, frame.left_px(), frame.right_px());
    let current_pd = pd_mm(smoothed.left_px, smoothed.right_px);

    let mut metrics = match prev {
        Some(_) => FrameMetrics::at_rest(),
        None => FrameMetrics::first_frame(),
    };

    if let Some(prev) = prev {
        let dt = (frame.timestamp - prev.last_timestamp) / 1000.0;
        if dt > 0.0 {
            metrics.velocity_mm_per_sec = (current_pd - prev.last_pd_mm) / dt;

            let left_velocity = (smoothed.left_px - prev.last_left_px) * PIXEL_TO_MM / dt;
            let right_velocity = (smoothed.right_px - prev.last_right_px) * PIXEL_TO_MM / dt;
            let symmetry = symmetry_index(left_velocity, right_velocity);
            metrics.symmetry_percent = symmetry.round().clamp(0.0, 100.0) as u8;
        }
    }

    FrameStep {
        state: FilterState {
            last_timestamp: frame.timestamp,
            last_left_px: smoothed.left_px,
            last_right_px: smoothed.right_px,
            last_pd_mm: current_pd,
        },
        metrics,
        pd_mm: current_pd,
    }
}
