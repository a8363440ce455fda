// ==========================================
// OEE 驾驶舱 - 租户上下文与查询范围
// ==========================================
// 职责: 会话/租户信息显式传参（不使用全局状态）
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// TenantContext - 租户上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub company_id: String,
    pub user_id: Option<String>,
}

impl TenantContext {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

// ==========================================
// TimeRange - 时间范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeRange {
    Today,
    /// 含当天在内的最近 7 天
    Week,
    /// 当月 1 日至当天
    Month,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl TimeRange {
    /// 解析为闭区间 [from, to]
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            TimeRange::Today => (today, today),
            TimeRange::Week => (today - Duration::days(6), today),
            TimeRange::Month => (today.with_day(1).unwrap_or(today), today),
            TimeRange::Custom { from, to } => (from, to),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(TimeRange::Today),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            other => Err(format!("未知时间范围: {}", other)),
        }
    }
}

// ==========================================
// LineFilter - 产线过滤
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineFilter {
    All,
    Line(String),
}

impl LineFilter {
    pub fn matches(&self, line_id: &str) -> bool {
        match self {
            LineFilter::All => true,
            LineFilter::Line(id) => id == line_id,
        }
    }
}

impl fmt::Display for LineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineFilter::All => write!(f, "all"),
            LineFilter::Line(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for LineFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("产线过滤条件不能为空".to_string());
        }
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(LineFilter::All)
        } else {
            Ok(LineFilter::Line(trimmed.to_string()))
        }
    }
}
