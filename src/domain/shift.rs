// ==========================================
// OEE 驾驶舱 - 班次观测领域模型
// ==========================================
// 职责: 班次级原始计数 + 合并停机后的计数集
// 单位: 时间均为分钟, 数量均为件
// ==========================================

use crate::domain::types::ShiftCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ShiftObservation - 班次观测记录
// ==========================================
// 用途: 操作员按 (租户, 产线, 日期, 班次) 录入的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftObservation {
    // ===== 归属 =====
    pub company_id: String,     // 租户ID
    pub line_id: String,        // 产线ID
    pub shift_date: NaiveDate,  // 班次日期
    pub shift: ShiftCode,       // 班次

    // ===== 时间 =====
    pub planned_time_min: f64,  // 计划生产时间
    pub stoppage_min: f64,      // 非换型停机时间
    #[serde(default)]
    pub setup_entries_min: Vec<f64>, // 各次换型/调机时间

    // ===== 产出 =====
    pub actual_production: f64,    // 实际产量
    pub ideal_cycle_time_min: f64, // 理论单件节拍 (分钟/件)

    // ===== 损失 =====
    #[serde(default)]
    pub rework: f64,        // 返工
    #[serde(default)]
    pub scrap: f64,         // 报废
    #[serde(default)]
    pub lost_packages: f64, // 丢失/破损包装
}

impl ShiftObservation {
    /// 原始换型时间合计（未扣除宽限）
    pub fn raw_setup_min(&self) -> f64 {
        self.setup_entries_min.iter().sum()
    }

    /// 质量损失合计（返工 + 报废 + 丢失）
    pub fn loss_units(&self) -> f64 {
        self.rework + self.scrap + self.lost_packages
    }
}

// ==========================================
// ShiftCounters - 计算用计数集
// ==========================================
// downtime 已合并: 非换型停机 + 扣除宽限后的换型时间
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShiftCounters {
    pub planned_time_min: f64,
    pub downtime_min: f64,
    pub actual_production: f64,
    pub ideal_cycle_time_min: f64,
    pub rework: f64,
    pub scrap: f64,
    pub lost_packages: f64,

    // ===== 可追溯字段 =====
    pub setup_raw_min: f64,     // 原始换型时间
    pub setup_counted_min: f64, // 计入停机的换型时间
}

impl ShiftCounters {
    /// 运行时间 = 计划时间 - 停机
    pub fn operating_time_min(&self) -> f64 {
        self.planned_time_min - self.downtime_min
    }

    /// 质量损失合计
    pub fn loss_units(&self) -> f64 {
        self.rework + self.scrap + self.lost_packages
    }

    /// 良品数
    pub fn good_units(&self) -> f64 {
        self.actual_production - self.loss_units()
    }
}
