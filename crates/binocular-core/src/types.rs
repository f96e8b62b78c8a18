use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FrameError;

/// 单帧检测结果：双眼虹膜中心（归一化坐标）与源帧尺寸
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingFrame {
    /// 单调时间戳（毫秒）
    pub timestamp: f64,
    pub left_iris_x: f64,
    pub right_iris_x: f64,
    #[serde(default)]
    pub left_iris_y: f64,
    #[serde(default)]
    pub right_iris_y: f64,
    #[serde(alias = "videoWidth")]
    pub frame_width: u32,
    #[serde(alias = "videoHeight")]
    pub frame_height: u32,
}

impl TrackingFrame {
    pub fn new(
        timestamp: f64,
        left_iris_x: f64,
        right_iris_x: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        Self {
            timestamp,
            left_iris_x,
            right_iris_x,
            left_iris_y: 0.0,
            right_iris_y: 0.0,
            frame_width,
            frame_height,
        }
    }

    /// 进入流水线前的调用方校验：尺寸必须为正，数值必须有限
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(FrameError::InvalidDimensions {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        let fields = [
            ("timestamp", self.timestamp),
            ("leftIrisX", self.left_iris_x),
            ("rightIrisX", self.right_iris_x),
            ("leftIrisY", self.left_iris_y),
            ("rightIrisY", self.right_iris_y),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(FrameError::NonFinite { field });
            }
        }
        Ok(())
    }

    pub fn left_px(&self) -> f64 {
        self.left_iris_x * f64::from(self.frame_width)
    }

    pub fn right_px(&self) -> f64 {
        self.right_iris_x * f64::from(self.frame_width)
    }
}

/// 单帧派生指标，只发布不保留
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    /// 带符号的 PD 变化率（mm/s），正值 = 发散，负值 = 集合
    pub velocity_mm_per_sec: f64,
    /// 对称指数 0-100
    pub symmetry_percent: u8,
}

impl FrameMetrics {
    /// 会话第一帧：没有上一帧可比较，速度与对称指数都记 0
    pub fn first_frame() -> Self {
        Self {
            velocity_mm_per_sec: 0.0,
            symmetry_percent: 0,
        }
    }

    /// 有上一帧但 Δt ≤ 0：速度 0，对称指数按静止约定记 100
    pub fn at_rest() -> Self {
        Self {
            velocity_mm_per_sec: 0.0,
            symmetry_percent: 100,
        }
    }

    /// 发布给 UI 的速度始终取绝对值
    pub fn speed_mm_per_sec(&self) -> f64 {
        self.velocity_mm_per_sec.abs()
    }
}

/// 录制期间每帧一个样本，创建后不再修改
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: f64,
    pub pd_mm: f64,
    /// 绝对值
    pub velocity_mm_per_sec: f64,
    pub symmetry_percent: u8,
    pub left_px: f64,
    pub right_px: f64,
}

/// 破裂点 / 恢复点对，序列化为 `"break/recovery"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakRecovery {
    pub break_point: f64,
    pub recovery: f64,
}

impl BreakRecovery {
    pub fn new(break_point: f64, recovery: f64) -> Self {
        Self {
            break_point,
            recovery,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.break_point.is_finite() && self.recovery.is_finite()
    }
}

impl fmt::Display for BreakRecovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/{:.1}", self.break_point, self.recovery)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBreakRecoveryError(String);

impl fmt::Display for ParseBreakRecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid break/recovery pair: {}", self.0)
    }
}

impl std::error::Error for ParseBreakRecoveryError {}

impl FromStr for BreakRecovery {
    type Err = ParseBreakRecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (b, r) = s
            .split_once('/')
            .ok_or_else(|| ParseBreakRecoveryError(s.to_string()))?;
        let break_point = b
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseBreakRecoveryError(s.to_string()))?;
        let recovery = r
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseBreakRecoveryError(s.to_string()))?;
        Ok(Self::new(break_point, recovery))
    }
}

impl Serialize for BreakRecovery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BreakRecovery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 会话结束时的临床估计；`None` 表示未计算（样本不足）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalMetrics {
    /// 远距隐斜（Δ）
    pub dist_phoria: Option<f64>,
    /// 远距正相对集合
    #[serde(rename = "distPRC")]
    pub dist_prc: Option<BreakRecovery>,
    /// 远距负相对集合
    #[serde(rename = "distNRC")]
    pub dist_nrc: Option<BreakRecovery>,
    /// 近距隐斜（Δ）
    pub near_phoria: Option<f64>,
    #[serde(rename = "nearPRC")]
    pub near_prc: Option<BreakRecovery>,
    #[serde(rename = "nearNRC")]
    pub near_nrc: Option<BreakRecovery>,
    /// 近距正相对调节（D）
    #[serde(rename = "nearPRA")]
    pub near_pra: Option<f64>,
    /// 近距负相对调节（D）
    #[serde(rename = "nearNRA")]
    pub near_nra: Option<f64>,
    pub ac_a: Option<f64>,
    /// 集合近点（cm）
    pub npc: Option<f64>,
    /// 最大调节力（D）
    pub max_accom: Option<f64>,
}

impl ClinicalMetrics {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// 趋势图上的一个点：时间戳与带符号速度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub t: f64,
    pub v: f64,
}
