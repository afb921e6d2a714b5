// ==========================================
// 建筑碳排放计算引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、保存
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::app_config::{AppConfig, FactorSource, UnknownKeyPolicy};
use crate::domain::types::TransportBasis;
use crate::engine::validation::{InputLimits, ValidationMode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败 ({path}): {message}")]
    Io { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    Parse { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 使用指定配置文件路径
    pub fn new<P: Into<PathBuf>>(config_path: P) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// 使用默认配置文件路径（可由 CARBON_CONSTRUCT_CONFIG 覆盖）
    pub fn with_default_path() -> Self {
        let path = std::env::var(config_keys::CONFIG_PATH)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::new(path)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置（文件 + 环境变量覆写）
    ///
    /// # 返回
    /// - Ok(AppConfig): 文件不存在时返回默认配置
    /// - Err(ConfigError): 文件无法读取/解析,或环境变量值非法
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let config = self.load_file()?;
        apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// 仅从文件加载（不应用环境变量）
    pub fn load_file(&self) -> ConfigResult<AppConfig> {
        let path_str = self.config_path.display().to_string();

        if !self.config_path.exists() {
            tracing::debug!(path = %path_str, "配置文件不存在，使用默认配置");
            return Ok(AppConfig::default());
        }

        let raw = fs::read_to_string(&self.config_path).map_err(|e| ConfigError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let config: AppConfig = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        validate_limits(&config.limits)?;

        tracing::info!(path = %path_str, "配置文件已加载");
        Ok(config)
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, config: &AppConfig) -> ConfigResult<()> {
        let path_str = self.config_path.display().to_string();
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        };

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Parse {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.config_path, json).map_err(io_err)?;
        Ok(())
    }
}

/// 默认配置文件路径: <config_dir>/carbon-construct/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("carbon-construct").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("./carbon-construct.json"))
}

/// 默认因子库路径（可由 CARBON_CONSTRUCT_DB_PATH 覆盖）
pub fn default_factor_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(config_keys::DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("carbon-construct").join("emission_factors.db"))
        .unwrap_or_else(|| PathBuf::from("./emission_factors.db"))
}

/// 应用环境变量覆写
///
/// `lookup` 为键 → 值的读取函数,便于测试时注入
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(value) = read(config_keys::FACTORS) {
        config.factor_source = FactorSource::from_path_str(&value);
    }

    if let Some(value) = read(config_keys::TRANSPORT_BASIS) {
        config.transport_basis = parse_value::<TransportBasis>(config_keys::TRANSPORT_BASIS, &value)?;
    }

    if let Some(value) = read(config_keys::VALIDATION_MODE) {
        config.validation_mode = parse_value::<ValidationMode>(config_keys::VALIDATION_MODE, &value)?;
    }

    if let Some(value) = read(config_keys::UNKNOWN_KEY_POLICY) {
        config.unknown_key_policy =
            parse_value::<UnknownKeyPolicy>(config_keys::UNKNOWN_KEY_POLICY, &value)?;
    }

    if let Some(value) = read(config_keys::LOCALE) {
        config.locale = value;
    }

    validate_limits(&config.limits)?;
    Ok(config)
}

/// 数值上限必须非负（+∞ 表示不设上限）
pub fn validate_limits(limits: &InputLimits) -> ConfigResult<()> {
    limits
        .validate()
        .map_err(|(field, max)| ConfigError::InvalidValue {
            key: format!("limits.max_{}", field),
            value: max.to_string(),
            message: "上限必须为非负数".to_string(),
        })
}

fn parse_value<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message,
    })
}

// ==========================================
// 配置键常量（环境变量名）
// ==========================================
pub mod config_keys {
    // 配置文件路径
    pub const CONFIG_PATH: &str = "CARBON_CONSTRUCT_CONFIG";

    // 因子库默认路径
    pub const DB_PATH: &str = "CARBON_CONSTRUCT_DB_PATH";

    // 因子来源（builtin / 文件路径 / .db 路径）
    pub const FACTORS: &str = "CARBON_CONSTRUCT_FACTORS";

    // 计算口径与校验
    pub const TRANSPORT_BASIS: &str = "CARBON_CONSTRUCT_TRANSPORT_BASIS";
    pub const VALIDATION_MODE: &str = "CARBON_CONSTRUCT_VALIDATION_MODE";
    pub const UNKNOWN_KEY_POLICY: &str = "CARBON_CONSTRUCT_UNKNOWN_KEY_POLICY";

    // 语言
    pub const LOCALE: &str = "CARBON_CONSTRUCT_LOCALE";
}
