// ==========================================
// 建筑碳排放计算引擎 - 领域模型层
// ==========================================
// 职责: 定义因子表、计算输入、计算结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod factor;
pub mod input;
pub mod result;
pub mod types;

// 重导出核心类型
pub use factor::{EmissionFactor, FactorLookup, FactorTable, FactorTableError, FactorTables};
pub use input::{CalculationInput, EnergyInput, MaterialInput, TransportInput};
pub use result::{Breakdown, CalculationResult, DetailedCalculation, LineItemEmission};
pub use types::{EmissionCategory, TransportBasis};
