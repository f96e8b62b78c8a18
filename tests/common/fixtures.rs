use serde_json::{json, Value};

/// 1280px 宽帧上两眼间距为 `gap_px` 像素的一帧
pub fn frame(timestamp: f64, gap_px: f64) -> Value {
    let width = 1280.0;
    json!({
        "timestamp": timestamp,
        "leftIrisX": (640.0 + gap_px / 2.0) / width,
        "rightIrisX": (640.0 - gap_px / 2.0) / width,
        "frameWidth": 1280,
        "frameHeight": 720,
    })
}

/// 30fps、两眼间距恒定的一段帧
pub fn steady_frames(count: usize, start_ms: f64, gap_px: f64) -> Vec<Value> {
    (0..count)
        .map(|i| frame(start_ms + i as f64 * 33.0, gap_px))
        .collect()
}

/// 先稳定后逐步集合：前 `steady` 帧间距不变，之后每帧收窄 `step_px`
pub fn converging_frames(count: usize, steady: usize, gap_px: f64, step_px: f64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let narrowed = i.saturating_sub(steady) as f64 * step_px;
            frame(i as f64 * 33.0, gap_px - narrowed)
        })
        .collect()
}

/// 478 点人脸网格，虹膜关键点放在给定的归一化横坐标上
pub fn face_landmarks(left_x: f64, right_x: f64) -> Vec<Value> {
    let mut points: Vec<Value> = (0..478).map(|_| json!({"x": 0.5, "y": 0.5, "z": 0.0})).collect();
    for idx in 469..=472 {
        points[idx] = json!({"x": left_x, "y": 0.45, "z": 0.0});
    }
    for idx in 474..=477 {
        points[idx] = json!({"x": right_x, "y": 0.45, "z": 0.0});
    }
    points
}
