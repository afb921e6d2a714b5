// ==========================================
// 建筑碳排放计算引擎 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::EmissionCategory;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 计算引擎错误
///
/// 引擎对未知因子键失败关闭: 不允许以 0 贡献静默跳过
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("未知排放因子键: category={category}, key={key}")]
    UnknownFactorKey {
        category: EmissionCategory,
        key: String,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, CalculationError>;

// ==========================================
// 输入校验错误（调用方侧）
// ==========================================

/// 被校验的数值字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Quantity,
    Distance,
    Weight,
    Amount,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::Quantity => "quantity",
            InputField::Distance => "distance",
            InputField::Weight => "weight",
            InputField::Amount => "amount",
        }
    }
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单条范围违规
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeViolation {
    pub category: EmissionCategory,
    pub index: usize,
    pub field: InputField,
    pub value: f64,
    pub max: f64,
    pub reason: String,
}

/// 输入校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("输入数值超出范围: {}个违规", violations.len())]
    OutOfRange { violations: Vec<RangeViolation> },

    #[error("输入数值不是数字: category={category}, index={index}, field={field}")]
    NotANumber {
        category: EmissionCategory,
        index: usize,
        field: InputField,
    },
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
