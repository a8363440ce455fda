// ==========================================
// OEE 驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含计算逻辑,不含文件读取逻辑
// ==========================================

pub mod metrics;
pub mod shift;
pub mod tenant;
pub mod types;

// 重导出核心类型
pub use metrics::{LineOeeSummary, OeeMetrics, ShiftOeeRecord};
pub use shift::{ShiftCounters, ShiftObservation};
pub use tenant::{LineFilter, TenantContext, TimeRange};
pub use types::{MetricKind, OeeRating, RangePolicy, RatingThresholds, ShiftCode};
