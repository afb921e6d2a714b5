// ==========================================
// 建筑碳排放计算引擎 - 计算结果
// ==========================================
// 每次调用返回新值,本模块不持久化
// 单位: kg CO2e,全精度（展示层负责取整）
// ==========================================

use crate::domain::types::EmissionCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 类别键 → 汇总排放
pub type Breakdown = BTreeMap<String, f64>;

// ==========================================
// CalculationResult - 汇总结果
// ==========================================
// 不变量:
// - total = material + transport + energy
// - 各类别 breakdown 之和 = 该类别合计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub material_emissions: f64,
    pub transport_emissions: f64,
    pub energy_emissions: f64,
    pub total_emissions: f64,
    pub breakdown_by_material: Breakdown,
    pub breakdown_by_transport: Breakdown,
    pub breakdown_by_energy: Breakdown,
}

impl CalculationResult {
    /// 按类别取合计
    pub fn category_total(&self, category: EmissionCategory) -> f64 {
        match category {
            EmissionCategory::Material => self.material_emissions,
            EmissionCategory::Transport => self.transport_emissions,
            EmissionCategory::Energy => self.energy_emissions,
        }
    }

    /// 按类别取明细
    pub fn breakdown(&self, category: EmissionCategory) -> &Breakdown {
        match category {
            EmissionCategory::Material => &self.breakdown_by_material,
            EmissionCategory::Transport => &self.breakdown_by_transport,
            EmissionCategory::Energy => &self.breakdown_by_energy,
        }
    }
}

// ==========================================
// LineItemEmission - 行项目排放
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemEmission {
    pub category: EmissionCategory,
    pub index: usize, // 在所属类别列表中的下标
    pub key: String,
    pub display_name: String,
    pub unit: String,
    pub emissions: f64,
}

/// 汇总结果 + 行项目明细
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedCalculation {
    pub result: CalculationResult,
    pub line_items: Vec<LineItemEmission>,
}
