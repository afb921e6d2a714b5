// ==========================================
// 建筑碳排放计算引擎 - 因子来源层错误类型
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 因子来源错误
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("因子表文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("因子库读取失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("因子库文件不存在: {path}")]
    DatabaseNotFound { path: String },

    #[error("因子来源为空: {source_name}")]
    EmptyTables { source_name: String },

    #[error("后台加载任务失败: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for ProviderError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProviderError::TaskFailed(err.to_string())
    }
}

/// Result 类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;
