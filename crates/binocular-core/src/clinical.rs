//! 临床估计汇总
//!
//! 会话结束时把整段 PD 时间序列归约成一组视光学估计值。
//! 全部公式建立在固定观看几何之上（50cm、0.45mm/px、成人平均瞳距 63mm），
//! 属于启发式近似而非经过验证的测量：
//!
//! - 基线 PD：前 `min(30, ⌊n × 0.1⌋)` 个样本的均值，视为静息集合状态
//! - mm → Δ：`Δ = mm / (观看距离cm × 0.1)`，保留 1 位小数
//! - 远距隐斜 = Δ(avg − baseline)，近距隐斜 = Δ(1.5 × (avg − baseline))
//! - 正 / 负相对集合：break/recovery 对，recovery 是 break 的固定比例
//! - 相对调节、AC/A、NPC、最大调节力见各函数

use serde::Serialize;

use crate::constants::{
    BASELINE_PD_MM, BASELINE_WINDOW_FRACTION, BASELINE_WINDOW_MAX, MIN_CLINICAL_SAMPLES,
    VIEWING_DISTANCE_CM,
};
use crate::types::{BreakRecovery, ClinicalMetrics, Sample};

/// 整段会话的 PD 统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub sample_count: usize,
    pub baseline_pd: f64,
    pub avg_pd: f64,
    pub min_pd: f64,
    pub max_pd: f64,
}

impl SessionStats {
    /// 基线 PD − 最小 PD（mm）
    pub fn max_convergence(&self) -> f64 {
        self.baseline_pd - self.min_pd
    }

    /// 最大 PD − 基线 PD（mm）
    pub fn max_divergence(&self) -> f64 {
        self.max_pd - self.baseline_pd
    }
}

pub fn baseline_window(sample_count: usize) -> usize {
    let fraction = (sample_count as f64 * BASELINE_WINDOW_FRACTION).floor() as usize;
    BASELINE_WINDOW_MAX.min(fraction)
}

/// 样本不足 `MIN_CLINICAL_SAMPLES` 时返回 `None`
pub fn session_stats(samples: &[Sample]) -> Option<SessionStats> {
    if samples.len() < MIN_CLINICAL_SAMPLES {
        return None;
    }

    let window = baseline_window(samples.len()).max(1);
    let baseline_pd = samples[..window].iter().map(|s| s.pd_mm).sum::<f64>() / window as f64;

    let mut sum = 0.0;
    let mut min_pd = f64::INFINITY;
    let mut max_pd = f64::NEG_INFINITY;
    for s in samples {
        sum += s.pd_mm;
        min_pd = min_pd.min(s.pd_mm);
        max_pd = max_pd.max(s.pd_mm);
    }

    Some(SessionStats {
        sample_count: samples.len(),
        baseline_pd,
        avg_pd: sum / samples.len() as f64,
        min_pd,
        max_pd,
    })
}

/// 四舍五入到指定位数（远离零），并把 -0.0 归一为 0.0
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 1Δ = 1m 处偏移 1cm，按假定观看距离线性缩放
pub fn mm_to_prism_diopters(mm: f64) -> f64 {
    round_to(mm / (VIEWING_DISTANCE_CM * 0.1), 1)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn pair(break_point: f64, recovery: f64) -> Option<BreakRecovery> {
    let pair = BreakRecovery::new(round_to(break_point, 1), round_to(recovery, 1));
    pair.is_finite().then_some(pair)
}

/// 汇总整段会话；样本不足时全部字段为 `None`，任何非有限结果同样记为 `None`
pub fn aggregate(samples: &[Sample]) -> ClinicalMetrics {
    let Some(stats) = session_stats(samples) else {
        tracing::debug!(
            sample_count = samples.len(),
            required = MIN_CLINICAL_SAMPLES,
            "Insufficient samples for clinical estimates"
        );
        return ClinicalMetrics::unset();
    };

    let deviation = stats.avg_pd - stats.baseline_pd;
    let dist_phoria = mm_to_prism_diopters(deviation);
    let near_phoria = mm_to_prism_diopters(1.5 * deviation);

    let max_convergence = stats.max_convergence();
    let max_divergence = stats.max_divergence();
    let prc_d = mm_to_prism_diopters(max_convergence);
    let nrc_d = mm_to_prism_diopters(max_divergence);

    let near_pra = round_to(max_convergence * 0.4 / (VIEWING_DISTANCE_CM * 0.1), 2);
    let near_nra = round_to(max_divergence * 0.3 / (VIEWING_DISTANCE_CM * 0.1), 2);

    // 50cm 处调节需求固定为 2.0D
    let accommodation = 100.0 / VIEWING_DISTANCE_CM;
    let ac_a = round_to(
        (near_phoria - dist_phoria).abs() / accommodation + BASELINE_PD_MM / 10.0,
        1,
    );

    let convergence_ratio = if stats.min_pd <= 0.0 {
        1.0
    } else {
        stats.baseline_pd / stats.min_pd
    };
    let npc = round_to(VIEWING_DISTANCE_CM / convergence_ratio, 1);

    let max_accom = round_to(prc_d / ac_a.max(1.0), 1);

    ClinicalMetrics {
        dist_phoria: finite(dist_phoria),
        dist_prc: pair(prc_d, prc_d * 0.7),
        dist_nrc: pair(nrc_d, nrc_d * 0.7),
        near_phoria: finite(near_phoria),
        near_prc: pair(prc_d * 1.3, prc_d * 0.9),
        near_nrc: pair(nrc_d * 0.8, nrc_d * 0.5),
        near_pra: finite(near_pra),
        near_nra: finite(near_nra),
        ac_a: finite(ac_a),
        npc: finite(npc),
        max_accom: finite(max_accom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(pds: &[f64]) -> Vec<Sample> {
        pds.iter()
            .enumerate()
            .map(|(i, &pd)| Sample {
                timestamp: i as f64 * 33.0,
                pd_mm: pd,
                velocity_mm_per_sec: 0.0,
                symmetry_percent: 100,
                left_px: 0.0,
                right_px: 0.0,
            })
            .collect()
    }

    #[test]
    fn nine_samples_is_insufficient() {
        let metrics = aggregate(&samples(&[60.0; 9]));
        assert!(metrics.is_unset());
    }

    #[test]
    fn ten_static_samples_yield_zero_ranges() {
        let metrics = aggregate(&samples(&[60.0; 10]));
        assert_eq!(metrics.dist_phoria, Some(0.0));
        assert_eq!(metrics.near_phoria, Some(0.0));
        assert_eq!(metrics.dist_prc, Some(BreakRecovery::new(0.0, 0.0)));
        assert_eq!(metrics.near_nrc, Some(BreakRecovery::new(0.0, 0.0)));
        assert_eq!(metrics.near_pra, Some(0.0));
        assert_eq!(metrics.near_nra, Some(0.0));
        assert_eq!(metrics.ac_a, Some(6.3));
        assert_eq!(metrics.npc, Some(50.0));
        assert_eq!(metrics.max_accom, Some(0.0));
    }

    #[test]
    fn baseline_window_is_capped() {
        assert_eq!(baseline_window(10), 1);
        assert_eq!(baseline_window(60), 6);
        assert_eq!(baseline_window(299), 29);
        assert_eq!(baseline_window(5000), 30);
    }

    #[test]
    fn zero_min_pd_uses_unit_ratio() {
        let mut pds = vec![60.0; 20];
        pds[15] = 0.0;
        let metrics = aggregate(&samples(&pds));
        assert_eq!(metrics.npc, Some(50.0));
        assert!(metrics.max_accom.is_some_and(f64::is_finite));
    }

    #[test]
    fn convergence_dip_produces_expected_pairs() {
        let mut pds = vec![60.0; 60];
        for (i, pd) in pds.iter_mut().enumerate().skip(20).take(20) {
            *pd = 60.0 - (i - 19) as f64 * 0.5;
        }
        let metrics = aggregate(&samples(&pds));
        assert_eq!(metrics.dist_prc.map(|p| p.to_string()).as_deref(), Some("2.0/1.4"));
        assert_eq!(metrics.near_prc.map(|p| p.to_string()).as_deref(), Some("2.6/1.8"));
        assert_eq!(metrics.dist_nrc.map(|p| p.to_string()).as_deref(), Some("0.0/0.0"));
        assert_eq!(metrics.near_pra, Some(0.8));
        assert_eq!(metrics.npc, Some(41.7));
    }

    #[test]
    fn prism_conversion_rounds_to_one_decimal() {
        assert_eq!(mm_to_prism_diopters(10.0), 2.0);
        assert_eq!(mm_to_prism_diopters(1.26), 0.3);
        assert_eq!(mm_to_prism_diopters(-0.1), 0.0);
        assert!(mm_to_prism_diopters(-0.1).is_sign_positive());
    }
}
