//! 单极点指数低通滤波
//!
//! `smoothed = prev + α × (raw − prev)`，左右眼 x 坐标各自独立滤波。
//! 首帧没有历史平滑值，直接取原始值。

use serde::{Deserialize, Serialize};

use crate::constants::SMOOTHING_ALPHA;

/// 滤波器状态，每处理一帧原地推进一次
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub last_timestamp: f64,
    /// 平滑后的像素坐标
    pub last_left_px: f64,
    pub last_right_px: f64,
    pub last_pd_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPair {
    pub left_px: f64,
    pub right_px: f64,
}

pub fn low_pass(prev: f64, raw: f64, alpha: f64) -> f64 {
    prev + alpha * (raw - prev)
}

pub fn smooth(prev: Option<&FilterState>, raw_left_px: f64, raw_right_px: f64) -> SmoothedPair {
    match prev {
        None => SmoothedPair {
            left_px: raw_left_px,
            right_px: raw_right_px,
        },
        Some(state) => SmoothedPair {
            left_px: low_pass(state.last_left_px, raw_left_px, SMOOTHING_ALPHA),
            right_px: low_pass(state.last_right_px, raw_right_px, SMOOTHING_ALPHA),
        },
    }
}
