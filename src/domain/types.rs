// ==========================================
// OEE 驾驶舱 - 领域类型定义
// ==========================================
// 职责: 班次、评级、取值策略等枚举类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 班次 (Shift Code)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftCode {
    Morning,   // 早班
    Afternoon, // 中班
    Night,     // 夜班
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftCode::Morning => write!(f, "MORNING"),
            ShiftCode::Afternoon => write!(f, "AFTERNOON"),
            ShiftCode::Night => write!(f, "NIGHT"),
        }
    }
}

impl FromStr for ShiftCode {
    type Err = String;

    /// 接受全称、首字母或班次序号（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MORNING" | "M" | "1" => Ok(ShiftCode::Morning),
            "AFTERNOON" | "A" | "2" => Ok(ShiftCode::Afternoon),
            "NIGHT" | "N" | "3" => Ok(ShiftCode::Night),
            other => Err(format!("未知班次: {}", other)),
        }
    }
}

// ==========================================
// OEE 评级 (OEE Rating)
// ==========================================
// 等级制: 由 OEE 百分比按阈值分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OeeRating {
    Critical,   // 严重偏低
    Low,        // 偏低
    Typical,    // 行业一般水平
    WorldClass, // 世界级
}

impl OeeRating {
    /// 按阈值判定评级
    pub fn classify(oee_pct: f64, thresholds: &RatingThresholds) -> Self {
        if oee_pct >= thresholds.world_class_pct {
            OeeRating::WorldClass
        } else if oee_pct >= thresholds.typical_pct {
            OeeRating::Typical
        } else if oee_pct >= thresholds.low_pct {
            OeeRating::Low
        } else {
            OeeRating::Critical
        }
    }
}

impl fmt::Display for OeeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OeeRating::Critical => write!(f, "CRITICAL"),
            OeeRating::Low => write!(f, "LOW"),
            OeeRating::Typical => write!(f, "TYPICAL"),
            OeeRating::WorldClass => write!(f, "WORLD_CLASS"),
        }
    }
}

/// 评级阈值（百分比，闭区间下限）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingThresholds {
    pub world_class_pct: f64,
    pub typical_pct: f64,
    pub low_pct: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            world_class_pct: 85.0,
            typical_pct: 60.0,
            low_pct: 40.0,
        }
    }
}

// ==========================================
// 取值范围策略 (Range Policy)
// ==========================================
// 决定越界输入/越界百分比的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangePolicy {
    /// 拒绝越界输入（负计数、停机超计划、损失超产量）
    #[default]
    Reject,
    /// 接受输入，三项比率截断到 [0, 100]
    Clamp,
    /// 原样输出（允许负值或超过 100）
    Passthrough,
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangePolicy::Reject => write!(f, "REJECT"),
            RangePolicy::Clamp => write!(f, "CLAMP"),
            RangePolicy::Passthrough => write!(f, "PASSTHROUGH"),
        }
    }
}

impl FromStr for RangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Ok(RangePolicy::Reject),
            "CLAMP" => Ok(RangePolicy::Clamp),
            "PASSTHROUGH" => Ok(RangePolicy::Passthrough),
            other => Err(format!("未知取值策略: {}", other)),
        }
    }
}

// ==========================================
// 指标类型 (Metric Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Availability, // 时间开动率
    Performance,  // 性能开动率
    Quality,      // 合格品率
    Oee,          // 综合效率
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Availability => write!(f, "AVAILABILITY"),
            MetricKind::Performance => write!(f, "PERFORMANCE"),
            MetricKind::Quality => write!(f, "QUALITY"),
            MetricKind::Oee => write!(f, "OEE"),
        }
    }
}
