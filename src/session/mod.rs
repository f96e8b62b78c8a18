//! 会话 worker：流水线的唯一写者
//!
//! 所有改变流水线状态的操作（送帧、开始 / 停止录制）都经 mpsc 命令通道
//! 按顺序交给同一个任务处理，因此开始 / 停止相对帧处理是原子的。
//! 读取方通过 watch 快照与 broadcast 事件获取结果，不会阻塞写者。

pub mod events;
pub mod snapshot;
pub mod worker;

use thiserror::Error;

pub use events::AnalysisEvent;
pub use snapshot::{LiveSnapshot, SessionInfo};
pub use worker::{
    spawn_session_worker, BatchOutcome, FrameRejection, SessionHandle, TransitionOutcome,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session worker is not running")]
    WorkerGone,
}
