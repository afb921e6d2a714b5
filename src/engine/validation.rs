// ==========================================
// 建筑碳排放计算引擎 - 输入范围校验器
// ==========================================
// 职责: 调用引擎前校验 quantity/distance/weight/amount ∈ [0, MAX]
// 模式: Strict 拒绝 / Clamp 截断并给出警告
// 说明: 计算器本身不做范围校验
// ==========================================

use crate::domain::input::CalculationInput;
use crate::domain::types::EmissionCategory;
use crate::engine::error::{InputField, RangeViolation, ValidationError, ValidationResult};
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};

// ==========================================
// InputLimits - 数值上限
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputLimits {
    pub max_quantity: f64, // 材料用量上限
    pub max_distance: f64, // 运输距离上限（公里）
    pub max_weight: f64,   // 运输重量上限（千克）
    pub max_amount: f64,   // 能源用量上限
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_quantity: 10_000_000.0,
            max_distance: 40_000.0,
            max_weight: 10_000_000.0,
            max_amount: 100_000_000.0,
        }
    }
}

impl InputLimits {
    /// 检查各上限是否可用（非负且不是 NaN,+∞ 表示不设上限）
    ///
    /// # 返回
    /// - Err((字段, 上限值)): 第一个不可用的上限
    pub fn validate(&self) -> Result<(), (InputField, f64)> {
        let limits = [
            (InputField::Quantity, self.max_quantity),
            (InputField::Distance, self.max_distance),
            (InputField::Weight, self.max_weight),
            (InputField::Amount, self.max_amount),
        ];
        match limits.into_iter().find(|(_, max)| max.is_nan() || *max < 0.0) {
            Some(invalid) => Err(invalid),
            None => Ok(()),
        }
    }
}

// ==========================================
// ValidationMode - 校验模式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// 严格模式：任何越界都返回错误
    Strict,
    /// 截断模式：越界值截断到 [0, MAX] 并记录警告
    Clamp,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Strict
    }
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "clamp" | "lenient" => Ok(ValidationMode::Clamp),
            other => Err(format!("未知校验模式: {}", other)),
        }
    }
}

// ==========================================
// CalculationWarning - 计算警告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationWarning {
    /// 数值被截断
    ValueClamped {
        category: EmissionCategory,
        index: usize,
        field: InputField,
        original: f64,
        clamped: f64,
    },
    /// 未知因子键的行被跳过
    UnknownKeySkipped {
        category: EmissionCategory,
        index: usize,
        key: String,
    },
}

impl CalculationWarning {
    /// 当前语言下的警告描述
    pub fn describe(&self) -> String {
        match self {
            CalculationWarning::ValueClamped {
                category,
                index,
                field,
                original,
                clamped,
            } => t_with_args(
                "warning.value_clamped",
                &[
                    ("category", category.as_str()),
                    ("index", &index.to_string()),
                    ("field", field.as_str()),
                    ("original", &original.to_string()),
                    ("clamped", &clamped.to_string()),
                ],
            ),
            CalculationWarning::UnknownKeySkipped {
                category,
                index,
                key,
            } => t_with_args(
                "warning.unknown_key_skipped",
                &[
                    ("category", category.as_str()),
                    ("index", &index.to_string()),
                    ("key", key),
                ],
            ),
        }
    }
}

/// 校验后的输入
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub input: CalculationInput,
    pub warnings: Vec<CalculationWarning>,
}

// ==========================================
// InputValidator - 输入校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator {
    limits: InputLimits,
    mode: ValidationMode,
}

impl InputValidator {
    pub fn new(limits: InputLimits, mode: ValidationMode) -> Self {
        debug_assert!(limits.validate().is_ok(), "invalid input limits: {:?}", limits);
        Self { limits, mode }
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// 校验计算输入
    ///
    /// # 返回
    /// - Ok(ValidatedInput): 校验通过（Clamp 模式下可能带截断警告）
    /// - Err(NotANumber): 出现 NaN（任何模式都拒绝）
    /// - Err(OutOfRange): Strict 模式下存在越界值
    pub fn validate(&self, mut input: CalculationInput) -> ValidationResult<ValidatedInput> {
        let mut pass = ValidationPass {
            mode: self.mode,
            violations: Vec::new(),
            warnings: Vec::new(),
        };
        let limits = self.limits;

        for (index, m) in input.materials.iter_mut().enumerate() {
            m.quantity = pass.check(
                EmissionCategory::Material,
                index,
                InputField::Quantity,
                m.quantity,
                limits.max_quantity,
            )?;
        }

        for (index, t) in input.transport.iter_mut().enumerate() {
            t.distance = pass.check(
                EmissionCategory::Transport,
                index,
                InputField::Distance,
                t.distance,
                limits.max_distance,
            )?;
            t.weight = pass.check(
                EmissionCategory::Transport,
                index,
                InputField::Weight,
                t.weight,
                limits.max_weight,
            )?;
        }

        for (index, e) in input.energy.iter_mut().enumerate() {
            e.amount = pass.check(
                EmissionCategory::Energy,
                index,
                InputField::Amount,
                e.amount,
                limits.max_amount,
            )?;
        }

        if !pass.violations.is_empty() {
            return Err(ValidationError::OutOfRange {
                violations: pass.violations,
            });
        }

        if !pass.warnings.is_empty() {
            tracing::warn!(
                clamped_count = pass.warnings.len(),
                "Clamp模式: 越界数值已截断"
            );
        }

        Ok(ValidatedInput {
            input,
            warnings: pass.warnings,
        })
    }
}

/// 单次校验的累积状态
struct ValidationPass {
    mode: ValidationMode,
    violations: Vec<RangeViolation>,
    warnings: Vec<CalculationWarning>,
}

impl ValidationPass {
    fn check(
        &mut self,
        category: EmissionCategory,
        index: usize,
        field: InputField,
        value: f64,
        max: f64,
    ) -> ValidationResult<f64> {
        if value.is_nan() {
            return Err(ValidationError::NotANumber {
                category,
                index,
                field,
            });
        }

        if value >= 0.0 && value <= max {
            return Ok(value);
        }

        match self.mode {
            ValidationMode::Strict => {
                let reason = if value < 0.0 {
                    "数值为负".to_string()
                } else {
                    format!("数值超过上限{}", max)
                };
                self.violations.push(RangeViolation {
                    category,
                    index,
                    field,
                    value,
                    max,
                    reason,
                });
                Ok(value)
            }
            ValidationMode::Clamp => {
                // 不用 f64::clamp: 上限非法时它会 panic
                let clamped = if value < 0.0 { 0.0 } else { max };
                self.warnings.push(CalculationWarning::ValueClamped {
                    category,
                    index,
                    field,
                    original: value,
                    clamped,
                });
                Ok(clamped)
            }
        }
    }
}
