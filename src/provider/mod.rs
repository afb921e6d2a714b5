// ==========================================
// 建筑碳排放计算引擎 - 因子来源层
// ==========================================
// 职责: 从内置数据 / 文件 / SQLite 加载三张因子表
// ==========================================

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod factor_provider;
pub mod file;
pub mod sqlite;

pub use builtin::{builtin_tables, BuiltinFactorProvider};
pub use catalog::FactorCatalog;
pub use error::{ProviderError, ProviderResult};
pub use factor_provider::FactorTableProvider;
pub use file::FileFactorProvider;
pub use sqlite::SqliteFactorProvider;
