// ==========================================
// OEE 驾驶舱 - 班次记录校验器
// ==========================================
// 职责: 进入计算前的结构性校验
// 范围: 标识非空、计数为有限数、计划时间与理论节拍为正
// 说明: 数值越界（负数、停机超计划等）由 OeeCalculator 的 RangePolicy 处理
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::shift::ShiftObservation;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    /// 严格模式：任何违规都返回错误
    Strict,
    /// 跳过模式：剔除违规记录并在结果中列出
    SkipInvalid,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => write!(f, "STRICT"),
            ValidationMode::SkipInvalid => write!(f, "SKIP_INVALID"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRICT" => Ok(ValidationMode::Strict),
            "SKIP_INVALID" => Ok(ValidationMode::SkipInvalid),
            other => Err(format!("未知校验模式: {}", other)),
        }
    }
}

/// 记录标识, 用于违规信息与日志
pub fn record_key(obs: &ShiftObservation) -> String {
    format!("{}@{}/{}", obs.line_id, obs.shift_date, obs.shift)
}

// ==========================================
// ObservationValidator - 班次记录校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservationValidator;

impl ObservationValidator {
    pub fn new() -> Self {
        Self
    }

    /// 收集单条记录的全部违规（不短路）
    pub fn check(&self, obs: &ShiftObservation) -> Vec<ValidationViolation> {
        let key = record_key(obs);
        let mut violations = Vec::new();

        for (field, value) in [("company_id", &obs.company_id), ("line_id", &obs.line_id)] {
            if value.trim().is_empty() {
                violations.push(ValidationViolation {
                    violation_type: "MISSING_ID".to_string(),
                    record_key: key.clone(),
                    reason: format!("{}不能为空", field),
                    details: None,
                });
            }
        }

        let counters = [
            ("planned_time_min", obs.planned_time_min),
            ("stoppage_min", obs.stoppage_min),
            ("actual_production", obs.actual_production),
            ("ideal_cycle_time_min", obs.ideal_cycle_time_min),
            ("rework", obs.rework),
            ("scrap", obs.scrap),
            ("lost_packages", obs.lost_packages),
        ];
        let setup = obs
            .setup_entries_min
            .iter()
            .map(|v| ("setup_entries_min", *v));

        for (field, value) in counters.into_iter().chain(setup) {
            if !value.is_finite() {
                violations.push(ValidationViolation {
                    violation_type: "NON_FINITE".to_string(),
                    record_key: key.clone(),
                    reason: format!("{}不是有限数", field),
                    details: Some(serde_json::json!({ "field": field })),
                });
            }
        }

        for (field, value) in [
            ("planned_time_min", obs.planned_time_min),
            ("ideal_cycle_time_min", obs.ideal_cycle_time_min),
        ] {
            if value.is_finite() && value <= 0.0 {
                violations.push(ValidationViolation {
                    violation_type: "NON_POSITIVE".to_string(),
                    record_key: key.clone(),
                    reason: format!("{}必须大于 0", field),
                    details: Some(serde_json::json!({ "field": field, "value": value })),
                });
            }
        }

        violations
    }

    /// 校验单条记录
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err(ApiError::ObservationValidationError): 存在违规
    pub fn validate(&self, obs: &ShiftObservation) -> ApiResult<()> {
        let violations = self.check(obs);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ObservationValidationError {
                reason: format!("{} 存在{}处违规", record_key(obs), violations.len()),
                violations,
            })
        }
    }
}
