// ==========================================
// OEE 驾驶舱 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 计算结果不得出现 NaN / Infinity
// ==========================================

use crate::domain::types::MetricKind;
use thiserror::Error;

/// 指标计算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OeeError {
    #[error("除零错误: 计算{metric}时 {denominator} 为 0")]
    DivisionByZero {
        metric: MetricKind,
        denominator: &'static str,
    },

    #[error("非有限输入: {field}={value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("取值越界: {field}={value}, {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: String,
    },

    #[error("没有可汇总的班次记录")]
    NoObservations,
}

/// Result 类型别名
pub type OeeResult<T> = Result<T, OeeError>;
