// ==========================================
// 建筑碳排放计算引擎 - 计算报告
// ==========================================
// 职责: 为结果附加行项目、类别占比、警告与元信息
// 说明: 展示层取整只在此处提供,计算器保持全精度
// ==========================================

use crate::domain::result::{CalculationResult, DetailedCalculation, LineItemEmission};
use crate::domain::types::{EmissionCategory, TransportBasis};
use crate::engine::validation::CalculationWarning;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 类别占比（百分比,合计为 0 时均为 0）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShares {
    pub material_pct: f64,
    pub transport_pct: f64,
    pub energy_pct: f64,
}

impl CategoryShares {
    pub fn from_result(result: &CalculationResult) -> Self {
        let total = result.total_emissions;
        if total == 0.0 || !total.is_finite() {
            return Self::default();
        }
        Self {
            material_pct: result.material_emissions / total * 100.0,
            transport_pct: result.transport_emissions / total * 100.0,
            energy_pct: result.energy_emissions / total * 100.0,
        }
    }

    pub fn get(&self, category: EmissionCategory) -> f64 {
        match category {
            EmissionCategory::Material => self.material_pct,
            EmissionCategory::Transport => self.transport_pct,
            EmissionCategory::Energy => self.energy_pct,
        }
    }
}

// ==========================================
// CalculationReport - 计算报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub transport_basis: TransportBasis,
    pub result: CalculationResult,
    pub line_items: Vec<LineItemEmission>,
    pub category_shares: CategoryShares,
    #[serde(default)]
    pub warnings: Vec<CalculationWarning>,
}

impl CalculationReport {
    /// 由明细计算结果构建报告
    pub fn build(
        detailed: DetailedCalculation,
        transport_basis: TransportBasis,
        warnings: Vec<CalculationWarning>,
    ) -> Self {
        let category_shares = CategoryShares::from_result(&detailed.result);
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            transport_basis,
            result: detailed.result,
            line_items: detailed.line_items,
            category_shares,
            warnings,
        }
    }

    /// 排放最高的 n 个行项目（降序）
    pub fn top_contributors(&self, n: usize) -> Vec<&LineItemEmission> {
        let mut items: Vec<&LineItemEmission> = self.line_items.iter().collect();
        items.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
        items.truncate(n);
        items
    }

    /// 主导类别（合计为 0 时返回 None）
    pub fn dominant_category(&self) -> Option<EmissionCategory> {
        if self.result.total_emissions == 0.0 {
            return None;
        }
        EmissionCategory::ALL.into_iter().max_by(|a, b| {
            self.result
                .category_total(*a)
                .total_cmp(&self.result.category_total(*b))
        })
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 展示层取整
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
