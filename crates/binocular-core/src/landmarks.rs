//! 虹膜中心提取
//!
//! 人脸关键点检测器本身是外部黑盒，这里只负责把一张脸的关键点集合
//! 归约成左右虹膜中心，生成 `TrackingFrame`。

use serde::{Deserialize, Serialize};

use crate::constants::{LEFT_IRIS_INDICES, RIGHT_IRIS_INDICES};
use crate::types::TrackingFrame;

/// 归一化关键点坐标 [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 指定索引的关键点均值；任一索引越界返回 `None`
pub fn centroid(landmarks: &[Landmark], indices: &[usize]) -> Option<Landmark> {
    if indices.is_empty() {
        return None;
    }
    let mut sum = Landmark::default();
    for &idx in indices {
        let lm = landmarks.get(idx)?;
        sum.x += lm.x;
        sum.y += lm.y;
        sum.z += lm.z;
    }
    let n = indices.len() as f64;
    Some(Landmark::new(sum.x / n, sum.y / n, sum.z / n))
}

/// 扁平数组 `[x0, y0, z0, x1, y1, z1, ...]` 转关键点列表，末尾不足 3 个的分量被丢弃
pub fn landmarks_from_flat(flat: &[f64]) -> Vec<Landmark> {
    flat.chunks_exact(3)
        .map(|c| Landmark::new(c[0], c[1], c[2]))
        .collect()
}

impl TrackingFrame {
    /// 由整张脸的关键点构造帧；关键点不足（没有虹膜拓扑）时视为未检测到
    pub fn from_face_landmarks(
        timestamp: f64,
        landmarks: &[Landmark],
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Self> {
        let left = centroid(landmarks, &LEFT_IRIS_INDICES)?;
        let right = centroid(landmarks, &RIGHT_IRIS_INDICES)?;
        Some(Self {
            timestamp,
            left_iris_x: left.x,
            right_iris_x: right.x,
            left_iris_y: left.y,
            right_iris_y: right.y,
            frame_width,
            frame_height,
        })
    }
}
