//! 双眼追踪器
//!
//! 持有流水线与分析状态，JS 侧在每次 requestAnimationFrame 回调中调用
//! `processFrame` / `processLandmarks`，录制按钮调用 `toggleRecording`。
//! 检测器抛出的异常由 JS 捕获后直接跳过本帧，不需要通知追踪器。

use wasm_bindgen::prelude::*;

use binocular_core::landmarks::landmarks_from_flat;
use binocular_core::{AnalysisState, TrackingFrame, Transition, VisionPipeline};

use crate::result::FrameResult;

#[wasm_bindgen]
pub struct BinocularTracker {
    pipeline: VisionPipeline,
    state: AnalysisState,
    /// 最近一次会话的样本数
    last_session_samples: usize,
}

#[wasm_bindgen]
impl BinocularTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            pipeline: VisionPipeline::new(),
            state: AnalysisState::new(),
            last_session_samples: 0,
        }
    }

    /// 输入双眼虹膜中心的归一化 x 坐标
    ///
    /// # 参数
    /// - `timestamp`: performance.now()（毫秒）
    /// - `left_x` / `right_x`: 虹膜中心 x，范围 [0,1]
    /// - `width` / `height`: 视频帧像素尺寸
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(
        &mut self,
        timestamp: f64,
        left_x: f64,
        right_x: f64,
        width: u32,
        height: u32,
    ) -> FrameResult {
        let frame = TrackingFrame::new(timestamp, left_x, right_x, width, height);
        self.process(&frame)
    }

    /// 输入整张脸的关键点，扁平数组 `[x0, y0, z0, x1, ...]`（478 点）
    ///
    /// 关键点不足以定位虹膜时返回 `undefined`，等同于本帧未检测到人脸。
    #[wasm_bindgen(js_name = "processLandmarks")]
    pub fn process_landmarks(
        &mut self,
        timestamp: f64,
        landmarks: &[f64],
        width: u32,
        height: u32,
    ) -> Option<FrameResult> {
        let lms = landmarks_from_flat(landmarks);
        let frame = TrackingFrame::from_face_landmarks(timestamp, &lms, width, height)?;
        Some(self.process(&frame))
    }

    /// 切换录制状态，返回切换后是否在录制
    #[wasm_bindgen(js_name = "toggleRecording")]
    pub fn toggle_recording(&mut self) -> bool {
        let transition = self.pipeline.toggle_recording(&mut self.state);
        self.note_transition(transition);
        self.state.is_recording
    }

    #[wasm_bindgen(js_name = "setRecording")]
    pub fn set_recording(&mut self, recording: bool) {
        let transition = self.pipeline.set_recording(recording, &mut self.state);
        self.note_transition(transition);
    }

    #[wasm_bindgen(js_name = "isRecording")]
    pub fn is_recording(&self) -> bool {
        self.state.is_recording
    }

    #[wasm_bindgen(js_name = "getVelocity")]
    pub fn get_velocity(&self) -> f64 {
        self.state.velocity
    }

    #[wasm_bindgen(js_name = "getSymmetry")]
    pub fn get_symmetry(&self) -> u8 {
        self.state.symmetry
    }

    #[wasm_bindgen(js_name = "getSampleCount")]
    pub fn get_sample_count(&self) -> usize {
        if self.pipeline.is_recording() {
            self.pipeline.buffer().len()
        } else {
            self.last_session_samples
        }
    }

    /// 趋势图数据 `[{t, v}, ...]`，最多 100 个点
    #[wasm_bindgen(js_name = "getHistory")]
    pub fn get_history(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.history).unwrap_or(JsValue::NULL)
    }

    /// 最近一次结束的会话的趋势，停止录制后不再滚动
    #[wasm_bindgen(js_name = "getSessionTrend")]
    pub fn get_session_trend(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.session_trend).unwrap_or(JsValue::NULL)
    }

    /// 趋势图速度序列，直接给图表使用
    #[wasm_bindgen(js_name = "getHistoryVelocities")]
    pub fn get_history_velocities(&self) -> js_sys::Float64Array {
        let values: Vec<f64> = self.state.history.iter().map(|p| p.v).collect();
        js_sys::Float64Array::from(values.as_slice())
    }

    /// 最近一次会话的临床估计，未计算的字段为 null
    #[wasm_bindgen(js_name = "getClinical")]
    pub fn get_clinical(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.clinical).unwrap_or(JsValue::NULL)
    }

    /// 完整状态快照（velocity / symmetry / isRecording / history / clinical）
    #[wasm_bindgen(js_name = "getState")]
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state).unwrap_or(JsValue::NULL)
    }

    /// 重置追踪器，丢弃当前会话
    pub fn reset(&mut self) {
        self.pipeline = VisionPipeline::new();
        self.state = AnalysisState::new();
        self.last_session_samples = 0;
    }
}

impl Default for BinocularTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BinocularTracker {
    fn process(&mut self, frame: &TrackingFrame) -> FrameResult {
        match self.pipeline.process_frame(frame, &mut self.state) {
            Ok(report) => report.into(),
            Err(_) => FrameResult::rejected(),
        }
    }

    fn note_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Started => self.last_session_samples = 0,
            Transition::Stopped { sample_count, .. } => self.last_session_samples = sample_count,
            Transition::Unchanged => {}
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }
}
