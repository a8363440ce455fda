// ==========================================
// OEE 驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 对象文件 (key-value), 缺省值内置
// ==========================================

use crate::domain::types::{RangePolicy, RatingThresholds};
use crate::api::validator::ValidationMode;
use crate::engine::oee::SETUP_GRACE_MINUTES;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const SETUP_GRACE_MINUTES: &str = "setup_grace_minutes";
    pub const RANGE_POLICY: &str = "range_policy";
    pub const RATING_WORLD_CLASS_PCT: &str = "rating_world_class_pct";
    pub const RATING_TYPICAL_PCT: &str = "rating_typical_pct";
    pub const RATING_LOW_PCT: &str = "rating_low_pct";
    pub const VALIDATION_MODE: &str = "validation_mode";

    pub const ALL: [&str; 6] = [
        SETUP_GRACE_MINUTES,
        RANGE_POLICY,
        RATING_WORLD_CLASS_PCT,
        RATING_TYPICAL_PCT,
        RATING_LOW_PCT,
        VALIDATION_MODE,
    ];
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    #[error("未知配置键: {0}")]
    UnknownKey(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// 计算相关配置快照（已解析的强类型值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OeeSettings {
    pub setup_grace_minutes: f64,
    pub range_policy: RangePolicy,
    pub rating_thresholds: RatingThresholds,
    pub validation_mode: ValidationMode,
}

impl Default for OeeSettings {
    fn default() -> Self {
        Self {
            setup_grace_minutes: SETUP_GRACE_MINUTES,
            range_policy: RangePolicy::default(),
            rating_thresholds: RatingThresholds::default(),
            validation_mode: ValidationMode::Strict,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 空配置,所有取值走缺省
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象文件加载
    ///
    /// 值可以是字符串、数字或布尔,统一按字符串保存
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let mut manager = Self::new();
        for (key, value) in parsed {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ConfigError::InvalidValue {
                        key,
                        value: other.to_string(),
                        message: "仅支持字符串/数字/布尔".to_string(),
                    })
                }
            };
            manager.set_config_value(&key, &text)?;
        }

        tracing::info!(path = %path.display(), keys = manager.values.len(), "配置加载完成");
        Ok(manager)
    }

    /// 从键值表构造（逐项校验）
    pub fn from_map<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut manager = Self::new();
        for (key, value) in entries {
            manager.set_config_value(key.as_ref(), value.as_ref())?;
        }
        Ok(manager)
    }

    /// 读取配置原始值
    pub fn get_global_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 写入配置值（先校验再写入）
    pub fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        if !config_keys::ALL.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let value = value.trim();
        validate_value(key, value)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    // ==========================================
    // 强类型读取
    // ==========================================

    pub fn get_setup_grace_minutes(&self) -> Result<f64, ConfigError> {
        self.parse_f64_or(config_keys::SETUP_GRACE_MINUTES, SETUP_GRACE_MINUTES)
    }

    pub fn get_range_policy(&self) -> Result<RangePolicy, ConfigError> {
        match self.get_global_config_value(config_keys::RANGE_POLICY) {
            Some(v) => v
                .parse()
                .map_err(|message| invalid(config_keys::RANGE_POLICY, v, message)),
            None => Ok(RangePolicy::default()),
        }
    }

    pub fn get_validation_mode(&self) -> Result<ValidationMode, ConfigError> {
        match self.get_global_config_value(config_keys::VALIDATION_MODE) {
            Some(v) => v
                .parse()
                .map_err(|message| invalid(config_keys::VALIDATION_MODE, v, message)),
            None => Ok(ValidationMode::Strict),
        }
    }

    /// 评级阈值,要求 世界级 ≥ 一般 ≥ 偏低
    pub fn get_rating_thresholds(&self) -> Result<RatingThresholds, ConfigError> {
        let defaults = RatingThresholds::default();
        let thresholds = RatingThresholds {
            world_class_pct: self
                .parse_f64_or(config_keys::RATING_WORLD_CLASS_PCT, defaults.world_class_pct)?,
            typical_pct: self.parse_f64_or(config_keys::RATING_TYPICAL_PCT, defaults.typical_pct)?,
            low_pct: self.parse_f64_or(config_keys::RATING_LOW_PCT, defaults.low_pct)?,
        };

        if thresholds.world_class_pct < thresholds.typical_pct
            || thresholds.typical_pct < thresholds.low_pct
        {
            return Err(invalid(
                config_keys::RATING_TYPICAL_PCT,
                &format!(
                    "{}/{}/{}",
                    thresholds.world_class_pct, thresholds.typical_pct, thresholds.low_pct
                ),
                "评级阈值必须递减".to_string(),
            ));
        }

        Ok(thresholds)
    }

    /// 一次性解析全部计算配置
    pub fn load_settings(&self) -> Result<OeeSettings, ConfigError> {
        Ok(OeeSettings {
            setup_grace_minutes: self.get_setup_grace_minutes()?,
            range_policy: self.get_range_policy()?,
            rating_thresholds: self.get_rating_thresholds()?,
            validation_mode: self.get_validation_mode()?,
        })
    }

    /// 获取生效配置快照（JSON 字符串,含缺省值）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let settings = self.load_settings()?;
        let mut snapshot: BTreeMap<&str, serde_json::Value> = BTreeMap::new();
        snapshot.insert(config_keys::SETUP_GRACE_MINUTES, json!(settings.setup_grace_minutes));
        snapshot.insert(config_keys::RANGE_POLICY, json!(settings.range_policy.to_string()));
        snapshot.insert(
            config_keys::RATING_WORLD_CLASS_PCT,
            json!(settings.rating_thresholds.world_class_pct),
        );
        snapshot.insert(
            config_keys::RATING_TYPICAL_PCT,
            json!(settings.rating_thresholds.typical_pct),
        );
        snapshot.insert(config_keys::RATING_LOW_PCT, json!(settings.rating_thresholds.low_pct));
        snapshot.insert(
            config_keys::VALIDATION_MODE,
            json!(settings.validation_mode.to_string()),
        );
        serde_json::to_string(&snapshot).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn parse_f64_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.get_global_config_value(key) {
            Some(v) => parse_non_negative(key, v),
            None => Ok(default),
        }
    }
}

fn invalid(key: &str, value: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message,
    }
}

fn parse_non_negative(key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| invalid(key, value, "不是有效数字".to_string()))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(invalid(key, value, "必须为非负有限数".to_string()));
    }
    Ok(parsed)
}

fn validate_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        config_keys::RANGE_POLICY => value
            .parse::<RangePolicy>()
            .map(|_| ())
            .map_err(|message| invalid(key, value, message)),
        config_keys::VALIDATION_MODE => value
            .parse::<ValidationMode>()
            .map(|_| ())
            .map_err(|message| invalid(key, value, message)),
        config_keys::RATING_WORLD_CLASS_PCT
        | config_keys::RATING_TYPICAL_PCT
        | config_keys::RATING_LOW_PCT => {
            let pct = parse_non_negative(key, value)?;
            if pct > 100.0 {
                return Err(invalid(key, value, "百分比不能超过 100".to_string()));
            }
            Ok(())
        }
        _ => parse_non_negative(key, value).map(|_| ()),
    }
}

/// 获取默认配置文件路径
///
/// 优先级: 环境变量 OEE_DASHBOARD_CONFIG_PATH > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("OEE_DASHBOARD_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("oee-dashboard").join("config.json"),
        None => PathBuf::from("./oee_dashboard.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let settings = ConfigManager::new().load_settings().unwrap();
        assert_eq!(settings, OeeSettings::default());
        assert_eq!(settings.setup_grace_minutes, 30.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut manager = ConfigManager::new();
        assert!(matches!(
            manager.set_config_value("season_mode", "AUTO"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut manager = ConfigManager::new();
        assert!(manager.set_config_value(config_keys::SETUP_GRACE_MINUTES, "-5").is_err());
        assert!(manager.set_config_value(config_keys::RANGE_POLICY, "ROUND").is_err());
        assert!(manager.set_config_value(config_keys::RATING_LOW_PCT, "120").is_err());
        assert!(manager.get_global_config_value(config_keys::RANGE_POLICY).is_none());
    }

    #[test]
    fn test_thresholds_must_be_descending() {
        let manager = ConfigManager::from_map([
            (config_keys::RATING_TYPICAL_PCT, "90"),
            (config_keys::RATING_WORLD_CLASS_PCT, "80"),
        ])
        .unwrap();
        assert!(manager.get_rating_thresholds().is_err());
    }
}
