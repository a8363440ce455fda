// ==========================================
// OEE 驾驶舱 - 核心库
// ==========================================
// 系统定位: 设备综合效率 (OEE) 指标计算与驾驶舱汇总
// 技术栈: Rust + serde + tracing
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - OEE 公式与汇总
pub mod engine;

// 导入层 - 班次记录文件
pub mod importer;

// 配置层 - 计算参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 驾驶舱接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    LineFilter, LineOeeSummary, MetricKind, OeeMetrics, OeeRating, RangePolicy,
    RatingThresholds, ShiftCode, ShiftCounters, ShiftObservation, ShiftOeeRecord, TenantContext,
    TimeRange,
};

// 引擎
pub use engine::{
    adjust_setup_time, calculate_availability, calculate_oee, calculate_performance,
    calculate_quality, OeeAggregator, OeeCalculator, OeeError, OeeResult,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DashboardQuery, DashboardSummary};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "OEE 驾驶舱";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
