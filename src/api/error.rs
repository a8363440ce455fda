// ==========================================
// OEE 驾驶舱 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换引擎/导入/配置错误为用户可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::OeeError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无权访问: {0}")]
    Forbidden(String),

    // ==========================================
    // 数据校验错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 班次记录校验失败（带详细原因）
    #[error("班次记录校验失败: {reason}")]
    ObservationValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 计算 / 导入 / 配置
    // ==========================================
    #[error("指标计算失败: {0}")]
    CalculationError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 OeeError 转换
// ==========================================
// 越界输入属于数据问题, 其余属于计算问题
impl From<OeeError> for ApiError {
    fn from(err: OeeError) -> Self {
        match err {
            OeeError::OutOfRange { .. } | OeeError::NonFiniteInput { .. } => {
                ApiError::ValidationError(err.to_string())
            }
            OeeError::NoObservations => ApiError::NotFound(err.to_string()),
            OeeError::DivisionByZero { .. } => ApiError::CalculationError(err.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 校验违规详情
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// 违规类型（MISSING_ID / NON_FINITE / NON_POSITIVE / OUT_OF_RANGE / CALCULATION）
    pub violation_type: String,
    /// 记录标识（line_id@shift_date/shift）
    pub record_key: String,
    /// 违规原因
    pub reason: String,
    /// 额外信息（可选）
    pub details: Option<serde_json::Value>,
}
