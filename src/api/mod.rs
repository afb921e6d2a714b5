// ==========================================
// 建筑碳排放计算引擎 - API 层
// ==========================================
// 职责: 组合因子来源、输入校验、计算引擎与报告,供 CLI 和库调用方使用
// ==========================================

pub mod calculation_api;
pub mod error;
pub mod factor_api;

// 重导出核心类型
pub use calculation_api::{CalculationApi, ComparisonResponse, Scenario, ScenarioReport};
pub use error::{ApiError, ApiResult};
pub use factor_api::{FactorApi, FactorImportResponse};
