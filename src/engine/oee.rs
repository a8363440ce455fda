// ==========================================
// OEE 驾驶舱 - OEE 基础公式
// ==========================================
// 职责: 四项比率 + 换型宽限规则
// 输入: 班次级计数 (分钟 / 件)
// 输出: 百分比 (×100)
// ==========================================
// 红线: 分母为 0 返回 DivisionByZero,不传播 NaN
// 说明: 公式本身不截断,越界处理由 OeeCalculator 的 RangePolicy 决定
// ==========================================

use crate::domain::types::MetricKind;
use crate::engine::error::{OeeError, OeeResult};

/// 换型宽限时间（分钟）: 前 30 分钟换型不计入停机
pub const SETUP_GRACE_MINUTES: f64 = 30.0;

fn ensure_finite(field: &'static str, value: f64) -> OeeResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OeeError::NonFiniteInput { field, value })
    }
}

// ==========================================
// 换型时间
// ==========================================

/// 扣除宽限后计入停机的换型时间: max(setup - 30, 0)
///
/// 负数输入属于调用方错误,不做校验（结果为 0）
pub fn adjust_setup_time(setup_minutes: f64) -> f64 {
    adjust_setup_time_with_grace(setup_minutes, SETUP_GRACE_MINUTES)
}

/// 按指定宽限时间扣除: max(setup - grace, 0)
pub fn adjust_setup_time_with_grace(setup_minutes: f64, grace_minutes: f64) -> f64 {
    (setup_minutes - grace_minutes).max(0.0)
}

// ==========================================
// 三项比率
// ==========================================

/// 时间开动率 = (计划时间 - 停机) / 计划时间 × 100
///
/// # 错误
/// - `planned_time == 0` → DivisionByZero
pub fn calculate_availability(planned_time: f64, downtime: f64) -> OeeResult<f64> {
    let planned_time = ensure_finite("planned_time", planned_time)?;
    let downtime = ensure_finite("downtime", downtime)?;

    if planned_time == 0.0 {
        return Err(OeeError::DivisionByZero {
            metric: MetricKind::Availability,
            denominator: "planned_time",
        });
    }

    Ok((planned_time - downtime) / planned_time * 100.0)
}

/// 性能开动率
///
/// - 运行时间 = 计划时间 - 停机
/// - 理论产量 = 运行时间 / 理论节拍
/// - 性能 = 实际产量 / 理论产量 × 100
///
/// 产出快于理论节拍时可超过 100,不截断
///
/// # 错误
/// - `ideal_cycle_time == 0` 或理论产量为 0 → DivisionByZero
pub fn calculate_performance(
    actual_production: f64,
    planned_time: f64,
    downtime: f64,
    ideal_cycle_time: f64,
) -> OeeResult<f64> {
    let actual_production = ensure_finite("actual_production", actual_production)?;
    let planned_time = ensure_finite("planned_time", planned_time)?;
    let downtime = ensure_finite("downtime", downtime)?;
    let ideal_cycle_time = ensure_finite("ideal_cycle_time", ideal_cycle_time)?;

    if ideal_cycle_time == 0.0 {
        return Err(OeeError::DivisionByZero {
            metric: MetricKind::Performance,
            denominator: "ideal_cycle_time",
        });
    }

    let operating_time = planned_time - downtime;
    let theoretical_production = operating_time / ideal_cycle_time;
    if theoretical_production == 0.0 {
        return Err(OeeError::DivisionByZero {
            metric: MetricKind::Performance,
            denominator: "theoretical_production",
        });
    }

    Ok(actual_production / theoretical_production * 100.0)
}

/// 合格品率 = (实际产量 - 返工 - 报废 - 丢失) / 实际产量 × 100
///
/// # 错误
/// - `actual_production == 0` → DivisionByZero
pub fn calculate_quality(
    actual_production: f64,
    rework: f64,
    scrap: f64,
    lost_packages: f64,
) -> OeeResult<f64> {
    let actual_production = ensure_finite("actual_production", actual_production)?;
    let rework = ensure_finite("rework", rework)?;
    let scrap = ensure_finite("scrap", scrap)?;
    let lost_packages = ensure_finite("lost_packages", lost_packages)?;

    if actual_production == 0.0 {
        return Err(OeeError::DivisionByZero {
            metric: MetricKind::Quality,
            denominator: "actual_production",
        });
    }

    let good_units = actual_production - (rework + scrap + lost_packages);
    Ok(good_units / actual_production * 100.0)
}

/// OEE = A × P × Q / 10000
///
/// 三项均为百分比,除以 10000 还原到单一百分比量纲
pub fn calculate_oee(availability: f64, performance: f64, quality: f64) -> f64 {
    availability * performance * quality / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_adjust_setup_time_grace() {
        assert_eq!(adjust_setup_time(0.0), 0.0);
        assert_eq!(adjust_setup_time(30.0), 0.0);
        assert_eq!(adjust_setup_time(45.0), 15.0);
        assert_eq!(adjust_setup_time(100.0), 70.0);
        assert_eq!(adjust_setup_time_with_grace(50.0, 20.0), 30.0);
    }

    #[test]
    fn test_availability() {
        assert_close(calculate_availability(480.0, 0.0).unwrap(), 100.0);
        assert_close(calculate_availability(480.0, 48.0).unwrap(), 90.0);
        assert_eq!(calculate_availability(480.0, 480.0).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_denominators() {
        assert_eq!(
            calculate_availability(0.0, 10.0),
            Err(OeeError::DivisionByZero {
                metric: MetricKind::Availability,
                denominator: "planned_time",
            })
        );
        assert!(matches!(
            calculate_performance(100.0, 480.0, 0.0, 0.0),
            Err(OeeError::DivisionByZero { denominator: "ideal_cycle_time", .. })
        ));
        assert!(matches!(
            calculate_performance(100.0, 480.0, 480.0, 0.4),
            Err(OeeError::DivisionByZero { denominator: "theoretical_production", .. })
        ));
        assert!(matches!(
            calculate_quality(0.0, 0.0, 0.0, 0.0),
            Err(OeeError::DivisionByZero { metric: MetricKind::Quality, .. })
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        assert!(matches!(
            calculate_availability(f64::NAN, 0.0),
            Err(OeeError::NonFiniteInput { field: "planned_time", .. })
        ));
        assert!(matches!(
            calculate_quality(100.0, f64::INFINITY, 0.0, 0.0),
            Err(OeeError::NonFiniteInput { field: "rework", .. })
        ));
    }

    #[test]
    fn test_oee_scaling() {
        assert_close(calculate_oee(100.0, 100.0, 100.0), 100.0);
        assert_close(calculate_oee(90.0, 92.59, 95.5), 79.581105);
    }
}
