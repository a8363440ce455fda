// ==========================================
// OEE 驾驶舱 - 引擎层
// ==========================================
// 职责: OEE 公式、班次计算流水线、多班次汇总
// 红线: 引擎无状态、无 I/O, 所有错误显式返回
// ==========================================

pub mod aggregate;
pub mod calculator;
pub mod error;
pub mod oee;

// 重导出核心引擎
pub use aggregate::OeeAggregator;
pub use calculator::OeeCalculator;
pub use error::{OeeError, OeeResult};
pub use oee::{
    adjust_setup_time, adjust_setup_time_with_grace, calculate_availability, calculate_oee,
    calculate_performance, calculate_quality, SETUP_GRACE_MINUTES,
};
