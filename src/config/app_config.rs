// ==========================================
// 建筑碳排放计算引擎 - 应用配置对象
// ==========================================
// 存储: JSON 文件（缺省字段取默认值）
// ==========================================

use crate::domain::types::TransportBasis;
use crate::engine::validation::{InputLimits, ValidationMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// FactorSource - 因子表来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorSource {
    /// 内置默认因子表
    Builtin,
    /// 因子表文件（.json / .csv / .xlsx / .xls）
    File { path: PathBuf },
    /// SQLite 因子库
    Sqlite { path: PathBuf },
}

impl Default for FactorSource {
    fn default() -> Self {
        FactorSource::Builtin
    }
}

impl FactorSource {
    /// 由路径推断来源（"builtin" / .db/.sqlite/.sqlite3 / 其余按文件处理）
    pub fn from_path_str(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("builtin") {
            return FactorSource::Builtin;
        }
        let path = PathBuf::from(trimmed);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "db" | "sqlite" | "sqlite3" => FactorSource::Sqlite { path },
            _ => FactorSource::File { path },
        }
    }
}

// ==========================================
// UnknownKeyPolicy - 未知因子键处理策略
// ==========================================
// 引擎本身总是失败关闭; 此策略只决定调用方如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeyPolicy {
    /// 中止计算并返回错误
    Abort,
    /// 跳过该行并记录警告
    SkipWithWarning,
}

impl Default for UnknownKeyPolicy {
    fn default() -> Self {
        UnknownKeyPolicy::Abort
    }
}

impl std::str::FromStr for UnknownKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(UnknownKeyPolicy::Abort),
            "skip" | "skip_with_warning" | "skip-with-warning" => {
                Ok(UnknownKeyPolicy::SkipWithWarning)
            }
            other => Err(format!("未知的未知键策略: {}", other)),
        }
    }
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub factor_source: FactorSource,
    pub transport_basis: TransportBasis,
    pub validation_mode: ValidationMode,
    pub unknown_key_policy: UnknownKeyPolicy,
    pub limits: InputLimits,
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            factor_source: FactorSource::default(),
            transport_basis: TransportBasis::default(),
            validation_mode: ValidationMode::default(),
            unknown_key_policy: UnknownKeyPolicy::default(),
            limits: InputLimits::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_source_from_path() {
        assert_eq!(FactorSource::from_path_str("builtin"), FactorSource::Builtin);
        assert_eq!(
            FactorSource::from_path_str("/data/factors.sqlite"),
            FactorSource::Sqlite {
                path: PathBuf::from("/data/factors.sqlite")
            }
        );
        assert_eq!(
            FactorSource::from_path_str(" factors.csv "),
            FactorSource::File {
                path: PathBuf::from("factors.csv")
            }
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"transport_basis": "tonne_kilometre",
                "factor_source": {"kind": "file", "path": "factors.json"},
                "limits": {"maxDistance": 500.0}}"#,
        )
        .unwrap();

        assert_eq!(config.transport_basis, TransportBasis::TonneKilometre);
        assert_eq!(config.validation_mode, ValidationMode::Strict);
        assert_eq!(config.limits.max_distance, 500.0);
        assert_eq!(config.limits.max_quantity, InputLimits::default().max_quantity);
        assert_eq!(config.locale, DEFAULT_LOCALE);
    }
}
