//! 固定的几何 / 光学模型常量
//!
//! 所有数值都基于假定的观看几何（50cm 观看距离、约 60° 水平视场、1280px 宽），
//! 没有逐用户标定步骤。

/// 低通滤波平滑系数（0.1 = 强平滑，0.9 = 高响应）
pub const SMOOTHING_ALPHA: f64 = 0.3;

/// 像素到毫米换算：2 × 500mm × tan(30°) ≈ 577mm / 1280px ≈ 0.45 mm/px
pub const PIXEL_TO_MM: f64 = 0.45;

/// 双眼合速度低于该值（mm/s）视为静止
pub const MOVEMENT_THRESHOLD_MM_PER_SEC: f64 = 1.0;

/// 假定观看距离（cm）
pub const VIEWING_DISTANCE_CM: f64 = 50.0;

/// 成人平均瞳距（mm），用于 AC/A 比值
pub const BASELINE_PD_MM: f64 = 63.0;

/// 临床汇总所需的最少样本数
pub const MIN_CLINICAL_SAMPLES: usize = 10;

/// 基线 PD 最多取前 30 个样本
pub const BASELINE_WINDOW_MAX: usize = 30;

/// 基线 PD 最多取会话前 10% 的样本
pub const BASELINE_WINDOW_FRACTION: f64 = 0.1;

/// 实时趋势图保留的点数
pub const TREND_HISTORY_CAPACITY: usize = 100;

/// 右眼虹膜关键点索引（FaceMesh 478 点拓扑）
pub const RIGHT_IRIS_INDICES: [usize; 4] = [474, 475, 476, 477];

/// 左眼虹膜关键点索引
pub const LEFT_IRIS_INDICES: [usize; 4] = [469, 470, 471, 472];
