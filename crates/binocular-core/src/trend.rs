use std::collections::VecDeque;

use serde::Serialize;

use crate::constants::TREND_HISTORY_CAPACITY;
use crate::types::TrendPoint;

/// 实时趋势图的有界历史，超出容量时丢弃最旧的点
#[derive(Debug, Clone)]
pub struct TrendHistory {
    points: VecDeque<TrendPoint>,
    capacity: usize,
}

impl Default for TrendHistory {
    fn default() -> Self {
        Self::with_capacity(TREND_HISTORY_CAPACITY)
    }
}

impl TrendHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, t: f64, v: f64) {
        self.points.push_back(TrendPoint { t, v });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrendPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<TrendPoint> {
        self.points.iter().copied().collect()
    }
}

impl Serialize for TrendHistory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points.iter())
    }
}
