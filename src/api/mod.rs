// ==========================================
// OEE 驾驶舱 - API 层
// ==========================================
// 职责: 提供驾驶舱查询接口, 供前端/命令行调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardQuery, DashboardSummary};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use validator::{ObservationValidator, ValidationMode};
