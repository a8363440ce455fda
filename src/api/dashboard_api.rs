// ==========================================
// OEE 驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 按租户/时间范围/产线过滤班次记录, 输出单班次、分产线、全局 OEE
// 架构: API 层 → ObservationValidator → OeeCalculator / OeeAggregator
// 说明: 租户上下文显式传入, 不依赖全局会话状态
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::api::validator::{record_key, ObservationValidator, ValidationMode};
use crate::config::OeeSettings;
use crate::domain::metrics::{LineOeeSummary, OeeMetrics, ShiftOeeRecord};
use crate::domain::shift::ShiftObservation;
use crate::domain::tenant::{LineFilter, TenantContext, TimeRange};
use crate::engine::{OeeAggregator, OeeCalculator, OeeError};

// ==========================================
// 请求 / 响应
// ==========================================

/// 驾驶舱查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub time_range: TimeRange,
    /// TimeRange 的参照日
    pub today: NaiveDate,
    pub line_filter: LineFilter,
}

/// 驾驶舱汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub company_id: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub line_filter: LineFilter,
    pub overall: OeeMetrics,
    /// 按 line_id 升序
    pub lines: Vec<LineOeeSummary>,
    /// 按 (日期, 班次, 产线) 升序
    pub shifts: Vec<ShiftOeeRecord>,
    /// SkipInvalid 模式下被剔除的记录
    pub skipped: Vec<ValidationViolation>,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    calculator: OeeCalculator,
    validator: ObservationValidator,
    mode: ValidationMode,
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new(OeeCalculator::new(), ValidationMode::Strict)
    }
}

impl DashboardApi {
    pub fn new(calculator: OeeCalculator, mode: ValidationMode) -> Self {
        Self {
            calculator,
            validator: ObservationValidator::new(),
            mode,
        }
    }

    pub fn from_settings(settings: &OeeSettings) -> Self {
        Self::new(OeeCalculator::from_settings(settings), settings.validation_mode)
    }

    pub fn calculator(&self) -> &OeeCalculator {
        &self.calculator
    }

    fn check_tenant(ctx: &TenantContext) -> ApiResult<()> {
        if ctx.company_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("租户ID不能为空".to_string()));
        }
        Ok(())
    }

    // ==========================================
    // 单班次
    // ==========================================

    /// 计算单条班次记录
    ///
    /// # 返回
    /// - Err(ApiError::Forbidden): 记录不属于当前租户
    /// - Err(ApiError::ObservationValidationError): 结构校验失败（与校验模式无关）
    pub fn evaluate_shift(
        &self,
        ctx: &TenantContext,
        obs: &ShiftObservation,
    ) -> ApiResult<ShiftOeeRecord> {
        Self::check_tenant(ctx)?;
        if obs.company_id != ctx.company_id {
            return Err(ApiError::Forbidden(format!(
                "记录 {} 不属于租户 {}",
                record_key(obs),
                ctx.company_id
            )));
        }

        self.validator.validate(obs)?;
        let metrics = self.calculator.calculate(obs)?;

        Ok(ShiftOeeRecord {
            line_id: obs.line_id.clone(),
            shift_date: obs.shift_date,
            shift: obs.shift,
            metrics,
        })
    }

    // ==========================================
    // 驾驶舱汇总
    // ==========================================

    /// 驾驶舱汇总查询
    ///
    /// 步骤:
    /// 1) 按租户、日期窗口、产线过滤
    /// 2) 逐条校验 + 计算（Strict 任一失败即返回错误; SkipInvalid 剔除并记录）
    /// 3) 分产线汇总、全局汇总
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 过滤后（或剔除后）没有记录
    #[instrument(skip(self, observations), fields(company = %ctx.company_id, total = observations.len()))]
    pub fn get_dashboard_summary(
        &self,
        ctx: &TenantContext,
        observations: &[ShiftObservation],
        query: &DashboardQuery,
    ) -> ApiResult<DashboardSummary> {
        Self::check_tenant(ctx)?;

        let (date_from, date_to) = query.time_range.resolve(query.today);
        if date_from > date_to {
            return Err(ApiError::InvalidInput(format!(
                "起始日期 {} 晚于结束日期 {}",
                date_from, date_to
            )));
        }

        let mut accepted: Vec<&ShiftObservation> = Vec::new();
        let mut shifts = Vec::new();
        let mut skipped = Vec::new();

        let in_scope = observations.iter().filter(|obs| {
            obs.company_id == ctx.company_id
                && obs.shift_date >= date_from
                && obs.shift_date <= date_to
                && query.line_filter.matches(&obs.line_id)
        });

        for obs in in_scope {
            match self.evaluate_one(obs) {
                Ok(metrics) => {
                    shifts.push(ShiftOeeRecord {
                        line_id: obs.line_id.clone(),
                        shift_date: obs.shift_date,
                        shift: obs.shift,
                        metrics,
                    });
                    accepted.push(obs);
                }
                Err(violations) => match self.mode {
                    ValidationMode::Strict => {
                        return Err(ApiError::ObservationValidationError {
                            reason: format!("{} 校验失败", record_key(obs)),
                            violations,
                        });
                    }
                    ValidationMode::SkipInvalid => {
                        warn!(record = %record_key(obs), count = violations.len(), "剔除违规班次记录");
                        skipped.extend(violations);
                    }
                },
            }
        }

        if accepted.is_empty() {
            return Err(ApiError::NotFound(format!(
                "租户 {} 在 {} ~ {} (产线 {}) 没有可用班次记录",
                ctx.company_id, date_from, date_to, query.line_filter
            )));
        }

        // 分产线汇总
        let mut by_line: BTreeMap<&str, Vec<&ShiftObservation>> = BTreeMap::new();
        for obs in accepted.iter().copied() {
            by_line.entry(obs.line_id.as_str()).or_default().push(obs);
        }

        let aggregator = OeeAggregator::new(&self.calculator);
        let mut lines = Vec::with_capacity(by_line.len());
        for (line_id, line_obs) in &by_line {
            let metrics = aggregator.aggregate(line_obs.iter().copied())?;
            lines.push(LineOeeSummary {
                line_id: line_id.to_string(),
                shift_count: line_obs.len(),
                metrics,
            });
        }

        let overall = aggregator.aggregate(accepted.iter().copied())?;

        shifts.sort_by(|a, b| {
            (a.shift_date, a.shift, &a.line_id).cmp(&(b.shift_date, b.shift, &b.line_id))
        });

        info!(
            shifts = shifts.len(),
            lines = lines.len(),
            skipped = skipped.len(),
            oee = overall.oee_pct,
            "驾驶舱汇总完成"
        );

        Ok(DashboardSummary {
            company_id: ctx.company_id.clone(),
            date_from,
            date_to,
            line_filter: query.line_filter.clone(),
            overall,
            lines,
            shifts,
            skipped,
        })
    }

    /// 校验 + 计算, 失败时统一转为违规列表
    fn evaluate_one(&self, obs: &ShiftObservation) -> Result<OeeMetrics, Vec<ValidationViolation>> {
        let violations = self.validator.check(obs);
        if !violations.is_empty() {
            return Err(violations);
        }

        self.calculator.calculate(obs).map_err(|e| {
            let violation_type = match e {
                OeeError::OutOfRange { .. } => "OUT_OF_RANGE",
                _ => "CALCULATION",
            };
            vec![ValidationViolation {
                violation_type: violation_type.to_string(),
                record_key: record_key(obs),
                reason: e.to_string(),
                details: None,
            }]
        })
    }
}
