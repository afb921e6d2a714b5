// ==========================================
// 建筑碳排放计算引擎 - 排放因子表
// ==========================================
// 职责: 排放因子记录 / 因子表 / 三表集合
// 红线: 因子表构造后不可变,所有因子必须为非负有限数
// ==========================================

use crate::domain::types::EmissionCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ==========================================
// EmissionFactor - 排放因子记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    pub display_name: String, // 显示名称
    pub factor: f64,          // kg CO2e / 单位
    pub unit: String,         // 计量单位（kg / kWh / km / t·km ...）
}

impl EmissionFactor {
    pub fn new(display_name: impl Into<String>, factor: f64, unit: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            factor,
            unit: unit.into(),
        }
    }
}

/// 因子表构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorTableError {
    #[error("排放因子键为空")]
    EmptyKey,

    #[error("排放因子为负数: key={key}, factor={factor}")]
    NegativeFactor { key: String, factor: f64 },

    #[error("排放因子不是有限数: key={key}")]
    NonFiniteFactor { key: String },

    #[error("排放因子键重复: key={0}")]
    DuplicateKey(String),
}

// ==========================================
// FactorLookup - 类型化查找结果
// ==========================================
// 未命中必须显式返回 NotFound,调用方不得将其视为 0
#[derive(Debug, Clone, PartialEq)]
pub enum FactorLookup<'a> {
    Found(&'a EmissionFactor),
    NotFound(String),
}

impl<'a> FactorLookup<'a> {
    pub fn into_option(self) -> Option<&'a EmissionFactor> {
        match self {
            FactorLookup::Found(factor) => Some(factor),
            FactorLookup::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FactorLookup::Found(_))
    }
}

// ==========================================
// FactorTable - 单类别因子表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, EmissionFactor>",
    into = "BTreeMap<String, EmissionFactor>"
)]
pub struct FactorTable {
    entries: BTreeMap<String, EmissionFactor>,
}

impl FactorTable {
    /// 空表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 由 (键, 因子) 序列构造因子表
    ///
    /// # 校验
    /// - 键去除首尾空白后不能为空
    /// - 因子必须为有限数且 >= 0
    /// - 键不能重复
    pub fn from_entries<K, I>(entries: I) -> Result<Self, FactorTableError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, EmissionFactor)>,
    {
        let mut map = BTreeMap::new();
        for (key, factor) in entries {
            let key = key.into().trim().to_string();
            validate_entry(&key, &factor)?;
            if map.contains_key(&key) {
                return Err(FactorTableError::DuplicateKey(key));
            }
            map.insert(key, factor);
        }
        Ok(Self { entries: map })
    }

    /// 类型化查找
    pub fn lookup(&self, key: &str) -> FactorLookup<'_> {
        match self.entries.get(key) {
            Some(factor) => FactorLookup::Found(factor),
            None => FactorLookup::NotFound(key.to_string()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&EmissionFactor> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionFactor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn validate_entry(key: &str, factor: &EmissionFactor) -> Result<(), FactorTableError> {
    if key.is_empty() {
        return Err(FactorTableError::EmptyKey);
    }
    if !factor.factor.is_finite() {
        return Err(FactorTableError::NonFiniteFactor {
            key: key.to_string(),
        });
    }
    if factor.factor < 0.0 {
        return Err(FactorTableError::NegativeFactor {
            key: key.to_string(),
            factor: factor.factor,
        });
    }
    Ok(())
}

impl TryFrom<BTreeMap<String, EmissionFactor>> for FactorTable {
    type Error = FactorTableError;

    fn try_from(map: BTreeMap<String, EmissionFactor>) -> Result<Self, Self::Error> {
        FactorTable::from_entries(map)
    }
}

impl From<FactorTable> for BTreeMap<String, EmissionFactor> {
    fn from(table: FactorTable) -> Self {
        table.entries
    }
}

// ==========================================
// FactorTables - 三张因子表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorTables {
    #[serde(default)]
    pub materials: FactorTable,
    #[serde(default)]
    pub transport: FactorTable,
    #[serde(default)]
    pub energy: FactorTable,
}

impl FactorTables {
    pub fn new(materials: FactorTable, transport: FactorTable, energy: FactorTable) -> Self {
        Self {
            materials,
            transport,
            energy,
        }
    }

    /// 按类别取表
    pub fn table(&self, category: EmissionCategory) -> &FactorTable {
        match category {
            EmissionCategory::Material => &self.materials,
            EmissionCategory::Transport => &self.transport,
            EmissionCategory::Energy => &self.energy,
        }
    }

    pub fn lookup(&self, category: EmissionCategory, key: &str) -> FactorLookup<'_> {
        self.table(category).lookup(key)
    }

    /// 三表条目总数
    pub fn total_entries(&self) -> usize {
        self.materials.len() + self.transport.len() + self.energy.len()
    }
}
