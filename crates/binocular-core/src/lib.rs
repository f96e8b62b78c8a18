//! 双眼视觉康复分析核心
//!
//! 逐帧处理流水线：虹膜中心 → 指数低通滤波 → 瞳距 / 集合速度 / 对称指数
//! → 会话样本缓冲 → 会话结束时的临床估计汇总。纯同步计算，不做 I/O。
//!
//! ## 模块
//! - `landmarks`: 从人脸关键点提取虹膜中心
//! - `filter`: 单极点指数低通滤波
//! - `metrics`: 单帧指标引擎
//! - `buffer`: 会话样本缓冲
//! - `clinical`: 临床估计汇总
//! - `pipeline`: 组合以上各步的单写者流水线
//! - `source`: 关键点来源抽象与帧轮询

pub mod buffer;
pub mod clinical;
pub mod constants;
pub mod error;
pub mod filter;
pub mod landmarks;
pub mod metrics;
pub mod pipeline;
pub mod source;
pub mod state;
pub mod trend;
pub mod types;

pub use buffer::SessionBuffer;
pub use error::{FrameError, SourceError};
pub use filter::FilterState;
pub use landmarks::Landmark;
pub use pipeline::{FrameReport, Transition, VisionPipeline};
pub use source::{poll_once, LandmarkSource, PollOutcome, ReplaySource};
pub use state::{AnalysisState, MetricsSink};
pub use trend::TrendHistory;
pub use types::{BreakRecovery, ClinicalMetrics, FrameMetrics, Sample, TrackingFrame, TrendPoint};
