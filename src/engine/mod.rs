// ==========================================
// 建筑碳排放计算引擎 - 引擎层
// ==========================================
// 职责: 排放计算、输入校验、报告构建、方案对比
// 红线: 引擎不做 I/O,不读写因子来源,计算器不打日志
// ==========================================

pub mod calculator;
pub mod comparison;
pub mod error;
pub mod report;
pub mod validation;

// 重导出核心引擎
pub use calculator::{calculate, transport_activity, EmissionCalculator, KG_PER_TONNE};
pub use comparison::{compare, KeyDelta, ScenarioComparison};
pub use error::{
    CalculationError, EngineResult, InputField, RangeViolation, ValidationError, ValidationResult,
};
pub use report::{round_to, CalculationReport, CategoryShares};
pub use validation::{
    CalculationWarning, InputLimits, InputValidator, ValidatedInput, ValidationMode,
};
