// ==========================================
// 建筑碳排放计算引擎 - 配置层
// ==========================================
// 职责: 应用配置管理（因子来源、计算口径、校验策略、语言）
// 存储: JSON 配置文件 + 环境变量覆写
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置类型
pub use app_config::{AppConfig, FactorSource, UnknownKeyPolicy, DEFAULT_LOCALE};
pub use config_manager::{
    apply_overrides, config_keys, default_config_path, default_factor_db_path, validate_limits,
    ConfigError, ConfigManager, ConfigResult,
};
