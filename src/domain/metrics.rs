// ==========================================
// OEE 驾驶舱 - 指标结果模型
// ==========================================

use crate::domain::types::{OeeRating, ShiftCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// OeeMetrics - 四项指标 + 过程量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeMetrics {
    pub availability_pct: f64,
    pub performance_pct: f64,
    pub quality_pct: f64,
    pub oee_pct: f64,
    pub rating: OeeRating,

    // ===== 过程量 =====
    pub downtime_min: f64,
    pub operating_time_min: f64,
    pub good_units: f64,
}

/// 单班次计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftOeeRecord {
    pub line_id: String,
    pub shift_date: NaiveDate,
    pub shift: ShiftCode,
    pub metrics: OeeMetrics,
}

/// 单产线汇总结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOeeSummary {
    pub line_id: String,
    pub shift_count: usize,
    pub metrics: OeeMetrics,
}
