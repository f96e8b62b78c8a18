//! 双眼视觉分析 WASM 库
//!
//! 把 `binocular-core` 的逐帧流水线编译为 WebAssembly，在浏览器端与
//! MediaPipe FaceLandmarker 配合运行：JS 负责摄像头与关键点检测，
//! 每帧把虹膜中心（或整张脸的关键点）交给 `BinocularTracker`。
//!
//! ## 模块
//! - `tracker`: 流水线与状态的 JS 封装
//! - `result`: 逐帧返回给 JS 的结果结构

pub mod result;
pub mod tracker;

pub use result::FrameResult;
pub use tracker::BinocularTracker;
