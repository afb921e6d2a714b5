// ==========================================
// 建筑碳排放计算引擎 - 核心库
// ==========================================
// 输入: 材料用量 / 运输距离 / 能源用量 + 三张排放因子表
// 输出: 分类别排放合计与明细（kg CO2e）
// 技术栈: Rust + SQLite（因子库）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 输入、因子表、结果
pub mod domain;

// 引擎层 - 排放计算、输入校验、报告、方案对比
pub mod engine;

// 因子来源层 - 内置 / 文件 / SQLite
pub mod provider;

// 导入层 - 因子表文件解析
pub mod importer;

// 数据仓储层 - 因子库
pub mod repository;

// 配置层
pub mod config;

// API 层
pub mod api;

// 报告导出
pub mod export;

// 命令行参数
pub mod cli;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 耗时统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CalculationInput, CalculationResult, EmissionCategory, EmissionFactor, EnergyInput,
    FactorTable, FactorTables, MaterialInput, TransportBasis, TransportInput,
};

pub use engine::{
    calculate, CalculationError, CalculationReport, EmissionCalculator, InputLimits,
    InputValidator, ValidationError, ValidationMode,
};

pub use provider::{FactorCatalog, FactorTableProvider};

pub use config::{AppConfig, ConfigManager, FactorSource, UnknownKeyPolicy};

pub use api::{ApiError, ApiResult, CalculationApi, FactorApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "建筑碳排放计算引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
