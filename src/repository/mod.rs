// ==========================================
// 建筑碳排放计算引擎 - 数据仓储层
// ==========================================
// 职责: 排放因子表的 SQLite 存取
// 红线: 仓储只存取因子,不持久化计算结果
// ==========================================

pub mod error;
pub mod factor_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use factor_repo::EmissionFactorRepository;
