// ==========================================
// OEE 驾驶舱 - 班次 OEE 计算器
// ==========================================
// 职责: 按固定顺序串联换型宽限 → 停机合并 → 三项比率 → OEE
// 输入: ShiftObservation / ShiftCounters
// 输出: OeeMetrics
// ==========================================
// 计算顺序（顺序不可调换）:
// 1) 合计各次换型时间
// 2) 扣除宽限 → 计入停机的换型时间
// 3) 与其他停机合并 → downtime
// 4) 时间开动率
// 5) 性能开动率（与第 4 步使用同一 downtime）
// 6) 合格品率
// 7) OEE
// ==========================================

use crate::config::OeeSettings;
use crate::domain::metrics::OeeMetrics;
use crate::domain::shift::{ShiftCounters, ShiftObservation};
use crate::domain::types::{MetricKind, OeeRating, RangePolicy, RatingThresholds};
use crate::engine::error::{OeeError, OeeResult};
use crate::engine::oee::{
    adjust_setup_time_with_grace, calculate_availability, calculate_oee, calculate_performance,
    calculate_quality, SETUP_GRACE_MINUTES,
};
use tracing::{debug, instrument};

// ==========================================
// OeeCalculator - 无状态计算器
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct OeeCalculator {
    setup_grace_min: f64,
    range_policy: RangePolicy,
    thresholds: RatingThresholds,
}

impl Default for OeeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl OeeCalculator {
    /// 默认参数: 宽限 30 分钟, Reject 策略, 默认评级阈值
    pub fn new() -> Self {
        Self {
            setup_grace_min: SETUP_GRACE_MINUTES,
            range_policy: RangePolicy::default(),
            thresholds: RatingThresholds::default(),
        }
    }

    pub fn from_settings(settings: &OeeSettings) -> Self {
        Self {
            setup_grace_min: settings.setup_grace_minutes,
            range_policy: settings.range_policy,
            thresholds: settings.rating_thresholds,
        }
    }

    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    pub fn with_setup_grace(mut self, grace_minutes: f64) -> Self {
        self.setup_grace_min = grace_minutes;
        self
    }

    pub fn with_thresholds(mut self, thresholds: RatingThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    pub fn setup_grace_min(&self) -> f64 {
        self.setup_grace_min
    }

    // ==========================================
    // 步骤 1-3: 停机合并
    // ==========================================

    /// 由班次记录构造计数集（换型宽限在此扣除）
    pub fn counters_for(&self, obs: &ShiftObservation) -> ShiftCounters {
        let setup_raw_min = obs.raw_setup_min();
        let setup_counted_min = adjust_setup_time_with_grace(setup_raw_min, self.setup_grace_min);

        ShiftCounters {
            planned_time_min: obs.planned_time_min,
            downtime_min: obs.stoppage_min + setup_counted_min,
            actual_production: obs.actual_production,
            ideal_cycle_time_min: obs.ideal_cycle_time_min,
            rework: obs.rework,
            scrap: obs.scrap,
            lost_packages: obs.lost_packages,
            setup_raw_min,
            setup_counted_min,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单班次指标（步骤 1-7）
    #[instrument(skip(self, obs), fields(line = %obs.line_id, date = %obs.shift_date, shift = %obs.shift))]
    pub fn calculate(&self, obs: &ShiftObservation) -> OeeResult<OeeMetrics> {
        if self.range_policy == RangePolicy::Reject {
            check_raw_entries(obs)?;
        }
        let counters = self.counters_for(obs);
        debug!(
            setup_raw_min = counters.setup_raw_min,
            setup_counted_min = counters.setup_counted_min,
            downtime_min = counters.downtime_min,
            "停机合并完成"
        );
        self.calculate_counters(&counters)
    }

    /// 单班次输入检查（不计算）
    ///
    /// Reject 策略下检查原始停机/换型条目及合并后的计数集;
    /// 其他策略只检查有限值
    pub fn check_observation(&self, obs: &ShiftObservation) -> OeeResult<()> {
        let counters = self.counters_for(obs);
        check_finite(&counters)?;
        if self.range_policy == RangePolicy::Reject {
            check_raw_entries(obs)?;
            check_ranges(&counters)?;
        }
        Ok(())
    }

    /// 由已合并停机的计数集计算指标（步骤 4-7）
    ///
    /// 停线班次: 运行时间为 0 时性能记 0, 实际产量为 0 时性能/合格率记 0;
    /// 计划时间或理论节拍为 0 仍返回 DivisionByZero
    pub fn calculate_counters(&self, c: &ShiftCounters) -> OeeResult<OeeMetrics> {
        check_finite(c)?;
        if self.range_policy == RangePolicy::Reject {
            check_ranges(c)?;
        }

        let availability = calculate_availability(c.planned_time_min, c.downtime_min)?;

        // 理论节拍为 0 属于主数据错误,停线班次也不豁免
        if c.ideal_cycle_time_min == 0.0 {
            return Err(OeeError::DivisionByZero {
                metric: MetricKind::Performance,
                denominator: "ideal_cycle_time",
            });
        }

        let operating_time = c.operating_time_min();
        let performance = if operating_time == 0.0 || c.actual_production == 0.0 {
            0.0
        } else {
            calculate_performance(
                c.actual_production,
                c.planned_time_min,
                c.downtime_min,
                c.ideal_cycle_time_min,
            )?
        };

        let quality = if c.actual_production == 0.0 {
            0.0
        } else {
            calculate_quality(c.actual_production, c.rework, c.scrap, c.lost_packages)?
        };

        let (availability, performance, quality) = match self.range_policy {
            RangePolicy::Clamp => (
                clamp_pct(availability),
                clamp_pct(performance),
                clamp_pct(quality),
            ),
            RangePolicy::Reject | RangePolicy::Passthrough => (availability, performance, quality),
        };

        let oee = calculate_oee(availability, performance, quality);
        let rating = OeeRating::classify(oee, &self.thresholds);

        debug!(availability, performance, quality, oee, %rating, "OEE 计算完成");

        Ok(OeeMetrics {
            availability_pct: availability,
            performance_pct: performance,
            quality_pct: quality,
            oee_pct: oee,
            rating,
            downtime_min: c.downtime_min,
            operating_time_min: operating_time,
            good_units: c.good_units(),
        })
    }
}

fn clamp_pct(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn counter_fields(c: &ShiftCounters) -> [(&'static str, f64); 7] {
    [
        ("planned_time", c.planned_time_min),
        ("downtime", c.downtime_min),
        ("actual_production", c.actual_production),
        ("ideal_cycle_time", c.ideal_cycle_time_min),
        ("rework", c.rework),
        ("scrap", c.scrap),
        ("lost_packages", c.lost_packages),
    ]
}

fn check_finite(c: &ShiftCounters) -> OeeResult<()> {
    for (field, value) in counter_fields(c) {
        if !value.is_finite() {
            return Err(OeeError::NonFiniteInput { field, value });
        }
    }
    Ok(())
}

/// 合并前的原始条目: 负的停机或换型条目会被合并结果掩盖
fn check_raw_entries(obs: &ShiftObservation) -> OeeResult<()> {
    if obs.stoppage_min < 0.0 {
        return Err(OeeError::OutOfRange {
            field: "stoppage",
            value: obs.stoppage_min,
            reason: "停机时间不能为负".to_string(),
        });
    }

    if let Some(&entry) = obs.setup_entries_min.iter().find(|&&v| v < 0.0) {
        return Err(OeeError::OutOfRange {
            field: "setup_entry",
            value: entry,
            reason: "换型条目不能为负".to_string(),
        });
    }

    Ok(())
}

/// Reject 策略下的输入范围检查
fn check_ranges(c: &ShiftCounters) -> OeeResult<()> {
    for (field, value) in counter_fields(c) {
        if value < 0.0 {
            return Err(OeeError::OutOfRange {
                field,
                value,
                reason: "计数不能为负".to_string(),
            });
        }
    }

    if c.downtime_min > c.planned_time_min {
        return Err(OeeError::OutOfRange {
            field: "downtime",
            value: c.downtime_min,
            reason: format!("停机超过计划时间 {}", c.planned_time_min),
        });
    }

    // 运行时间为 0 却有产量: 停机或产量记录有误
    if c.operating_time_min() == 0.0 && c.actual_production > 0.0 {
        return Err(OeeError::OutOfRange {
            field: "actual_production",
            value: c.actual_production,
            reason: "运行时间为 0 但产量不为 0".to_string(),
        });
    }

    if c.loss_units() > c.actual_production {
        return Err(OeeError::OutOfRange {
            field: "loss_units",
            value: c.loss_units(),
            reason: format!("质量损失超过实际产量 {}", c.actual_production),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(planned: f64, downtime: f64, actual: f64, losses: f64) -> ShiftCounters {
        ShiftCounters {
            planned_time_min: planned,
            downtime_min: downtime,
            actual_production: actual,
            ideal_cycle_time_min: 0.4,
            scrap: losses,
            ..Default::default()
        }
    }

    #[test]
    fn test_reject_policy_blocks_downtime_over_planned() {
        let calc = OeeCalculator::new();
        let err = calc.calculate_counters(&counters(480.0, 500.0, 100.0, 0.0)).unwrap_err();
        assert!(matches!(err, OeeError::OutOfRange { field: "downtime", .. }));
    }

    #[test]
    fn test_reject_policy_blocks_losses_over_production() {
        let calc = OeeCalculator::new();
        let err = calc.calculate_counters(&counters(480.0, 0.0, 100.0, 120.0)).unwrap_err();
        assert!(matches!(err, OeeError::OutOfRange { field: "loss_units", .. }));
    }

    #[test]
    fn test_clamp_policy_bounds_ratios() {
        let calc = OeeCalculator::new().with_range_policy(RangePolicy::Clamp);
        let m = calc.calculate_counters(&counters(480.0, 0.0, 100.0, 120.0)).unwrap();
        assert_eq!(m.quality_pct, 0.0);
        assert_eq!(m.oee_pct, 0.0);

        // 产出快于理论节拍
        let m = calc.calculate_counters(&counters(480.0, 0.0, 1500.0, 0.0)).unwrap();
        assert_eq!(m.performance_pct, 100.0);
    }

    #[test]
    fn test_passthrough_policy_keeps_raw_values() {
        let calc = OeeCalculator::new().with_range_policy(RangePolicy::Passthrough);
        let m = calc.calculate_counters(&counters(480.0, 0.0, 100.0, 120.0)).unwrap();
        assert!((m.quality_pct - (-20.0)).abs() < 1e-9);
        assert!(m.oee_pct < 0.0);
    }

    #[test]
    fn test_stopped_shift_reports_zero() {
        let calc = OeeCalculator::new();
        let m = calc.calculate_counters(&counters(480.0, 480.0, 0.0, 0.0)).unwrap();
        assert_eq!(m.availability_pct, 0.0);
        assert_eq!(m.performance_pct, 0.0);
        assert_eq!(m.quality_pct, 0.0);
        assert_eq!(m.oee_pct, 0.0);
        assert_eq!(m.rating, OeeRating::Critical);
    }

    #[test]
    fn test_reject_policy_blocks_output_without_operating_time() {
        let calc = OeeCalculator::new();
        let err = calc.calculate_counters(&counters(480.0, 480.0, 1000.0, 0.0)).unwrap_err();
        assert!(matches!(err, OeeError::OutOfRange { field: "actual_production", .. }));

        // Clamp 下仍按停线班次记 0
        let calc = OeeCalculator::new().with_range_policy(RangePolicy::Clamp);
        let m = calc.calculate_counters(&counters(480.0, 480.0, 1000.0, 0.0)).unwrap();
        assert_eq!(m.performance_pct, 0.0);
    }

    #[test]
    fn test_zero_planned_time_is_error() {
        let calc = OeeCalculator::new();
        let err = calc.calculate_counters(&counters(0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, OeeError::DivisionByZero { denominator: "planned_time", .. }));
    }
}
