//! 合成关键点源
//!
//! 没有摄像头时用来驱动会话 worker：瞳距按三角波在集合 / 散开之间往复，
//! 叠加带种子的抖动，并按配置概率产生"未检测到人脸"与检测器异常。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use binocular_core::constants::{BASELINE_PD_MM, PIXEL_TO_MM};
use binocular_core::{LandmarkSource, SourceError, TrackingFrame};

use crate::config::SimulatorConfig;

const FRAME_WIDTH: u32 = 1280;
const FRAME_HEIGHT: u32 = 720;
/// 一次完整集合-散开往复的时长
const CYCLE_MS: f64 = 6000.0;
const SWING_MM: f64 = 8.0;
const JITTER_PX: f64 = 0.6;

pub struct SyntheticSource {
    rng: StdRng,
    frame_interval_ms: f64,
    drop_rate: f64,
    fault_rate: f64,
    timestamp: f64,
}

impl SyntheticSource {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            frame_interval_ms: 1000.0 / f64::from(config.fps.max(1)),
            drop_rate: config.drop_rate.clamp(0.0, 1.0),
            fault_rate: config.fault_rate.clamp(0.0, 1.0),
            timestamp: 0.0,
        }
    }

    /// 当前时刻的目标瞳距：前半周期向内集合，后半周期散开越过基线
    pub fn target_pd_mm(timestamp: f64) -> f64 {
        let phase = (timestamp % CYCLE_MS) / CYCLE_MS;
        let triangle = if phase < 0.5 {
            1.0 - 4.0 * phase
        } else {
            4.0 * phase - 3.0
        };
        // triangle ∈ [-1, 1]，起点为 +1
        BASELINE_PD_MM + SWING_MM * triangle
    }

    fn frame_at(&mut self, timestamp: f64) -> TrackingFrame {
        let width = f64::from(FRAME_WIDTH);
        let half_gap_px = Self::target_pd_mm(timestamp) / PIXEL_TO_MM / 2.0;
        let center_px = width / 2.0;

        let left_px = center_px + half_gap_px + self.rng.gen_range(-JITTER_PX..=JITTER_PX);
        let right_px = center_px - half_gap_px + self.rng.gen_range(-JITTER_PX..=JITTER_PX);
        let iris_y = 0.45 + self.rng.gen_range(-0.002..=0.002);

        TrackingFrame {
            timestamp,
            left_iris_x: left_px / width,
            right_iris_x: right_px / width,
            left_iris_y: iris_y,
            right_iris_y: iris_y,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
        }
    }
}

impl LandmarkSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<TrackingFrame>, SourceError> {
        let timestamp = self.timestamp;
        self.timestamp += self.frame_interval_ms;

        let roll: f64 = self.rng.gen();
        if roll < self.fault_rate {
            return Err(SourceError::Detection(format!(
                "synthetic detector fault at {timestamp:.0}ms"
            )));
        }
        if roll < self.fault_rate + self.drop_rate {
            return Ok(None);
        }
        Ok(Some(self.frame_at(timestamp)))
    }
}

#[cfg(test)]
mod tests {
    use binocular_core::{poll_once, AnalysisState, PollOutcome, VisionPipeline};

    use super::*;

    fn config(drop_rate: f64, fault_rate: f64) -> SimulatorConfig {
        SimulatorConfig {
            enabled: true,
            fps: 50,
            seed: 7,
            drop_rate,
            fault_rate,
        }
    }

    #[test]
    fn pd_cycle_swings_around_baseline() {
        assert!((SyntheticSource::target_pd_mm(0.0) - (BASELINE_PD_MM + SWING_MM)).abs() < 1e-9);
        assert!(
            (SyntheticSource::target_pd_mm(CYCLE_MS / 2.0) - (BASELINE_PD_MM - SWING_MM)).abs()
                < 1e-9
        );
        assert!((SyntheticSource::target_pd_mm(CYCLE_MS / 4.0) - BASELINE_PD_MM).abs() < 1e-9);
    }

    #[test]
    fn timestamps_advance_at_configured_rate() {
        let mut source = SyntheticSource::new(&config(0.0, 0.0));
        let a = source.next_frame().unwrap().unwrap();
        let b = source.next_frame().unwrap().unwrap();
        assert_eq!(a.timestamp, 0.0);
        assert_eq!(b.timestamp, 20.0);
        assert!(a.validate().is_ok());
        assert!(a.left_iris_x > a.right_iris_x);
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = SyntheticSource::new(&config(0.2, 0.1));
        let mut b = SyntheticSource::new(&config(0.2, 0.1));
        for _ in 0..50 {
            let fa = a.next_frame().ok().flatten();
            let fb = b.next_frame().ok().flatten();
            assert_eq!(fa, fb);
        }
    }

    #[test]
    fn always_faulting_source_never_reaches_the_pipeline() {
        let mut source = SyntheticSource::new(&config(0.0, 1.0));
        let mut pipeline = VisionPipeline::new();
        let mut state = AnalysisState::new();
        for _ in 0..10 {
            assert_eq!(
                poll_once(&mut source, &mut pipeline, &mut state),
                PollOutcome::Faulted
            );
        }
        assert_eq!(pipeline.frames_processed(), 0);
    }

    #[test]
    fn full_cycle_produces_clinical_ranges() {
        let mut source = SyntheticSource::new(&config(0.0, 0.0));
        let mut pipeline = VisionPipeline::new();
        let mut state = AnalysisState::new();
        pipeline.set_recording(true, &mut state);
        // 50fps × 6s = 一个完整周期
        for _ in 0..300 {
            poll_once(&mut source, &mut pipeline, &mut state);
        }
        pipeline.set_recording(false, &mut state);

        let clinical = state.clinical;
        let prc = clinical.dist_prc.expect("convergence range");
        let nrc = clinical.dist_nrc.expect("divergence range");
        assert!(prc.break_point > 1.0, "prc {prc}");
        assert!(nrc.break_point >= 0.0);
        assert!(clinical.npc.is_some_and(|npc| npc < 50.0));
    }

    proptest::proptest! {
        #[test]
        fn synthetic_frames_are_always_valid(seed in 0u64..10_000, fps in 1u32..=240) {
            let mut source = SyntheticSource::new(&SimulatorConfig {
                enabled: true,
                fps,
                seed,
                drop_rate: 0.0,
                fault_rate: 0.0,
            });
            for _ in 0..64 {
                let frame = source.next_frame().unwrap().unwrap();
                proptest::prop_assert!(frame.validate().is_ok());
                let gap_mm = (frame.left_px() - frame.right_px()) * PIXEL_TO_MM;
                proptest::prop_assert!(gap_mm > BASELINE_PD_MM - SWING_MM - 1.0);
                proptest::prop_assert!(gap_mm < BASELINE_PD_MM + SWING_MM + 1.0);
            }
        }
    }
}
