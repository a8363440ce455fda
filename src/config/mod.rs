// ==========================================
// OEE 驾驶舱 - 配置层
// ==========================================
// 职责: 计算参数管理（宽限时间、取值策略、评级阈值、校验模式）
// 存储: JSON key-value 文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, get_default_config_path, ConfigError, ConfigManager, OeeSettings,
};
