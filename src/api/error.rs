// ==========================================
// 建筑碳排放计算引擎 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,转换为调用方可读的错误消息
// ==========================================

use crate::config::config_manager::ConfigError;
use crate::domain::types::EmissionCategory;
use crate::engine::error::{CalculationError, RangeViolation, ValidationError};
use crate::importer::error::ImportError;
use crate::provider::error::ProviderError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 计算错误
    // ==========================================
    #[error("未知排放因子键: category={category}, key={key}")]
    UnknownFactorKey {
        category: EmissionCategory,
        key: String,
    },

    /// 输入越界（Strict 模式）
    #[error("输入数值超出范围: {}个违规", violations.len())]
    InputOutOfRange { violations: Vec<RangeViolation> },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 因子来源错误
    // ==========================================
    #[error("因子来源不可用: {0}")]
    FactorSourceError(String),

    #[error("因子表导入失败: {0}")]
    ImportError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 配置/通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::UnknownFactorKey { category, key } => {
                ApiError::UnknownFactorKey { category, key }
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::OutOfRange { violations } => ApiError::InputOutOfRange { violations },
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Import(e) => ApiError::from(e),
            ProviderError::Repository(e) => ApiError::from(e),
            other => ApiError::FactorSourceError(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
