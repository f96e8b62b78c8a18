use thiserror::Error;

/// 输入帧无法进入流水线的原因
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("non-finite value in field `{field}`")]
    NonFinite { field: &'static str },
}

/// 外部关键点检测器的故障；单帧故障不会终止帧循环
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("landmark detection failed: {0}")]
    Detection(String),
    #[error("landmark model unavailable: {0}")]
    ModelUnavailable(String),
}

impl FrameError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "INVALID_FRAME_DIMENSIONS",
            Self::NonFinite { .. } => "NON_FINITE_FRAME_VALUE",
        }
    }
}
