// ==========================================
// 建筑碳排放计算引擎 - 方案对比
// ==========================================
// 输入: 基准方案结果 / 备选方案结果
// 输出: 合计、类别、分项键的差值
// 红线: 无状态,纯函数
// ==========================================

use crate::domain::result::CalculationResult;
use crate::domain::types::EmissionCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 单个分项键的变化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDelta {
    pub category: EmissionCategory,
    pub key: String,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

// ==========================================
// ScenarioComparison - 方案对比结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub baseline_total: f64,
    pub candidate_total: f64,
    pub total_delta: f64,
    pub material_delta: f64,
    pub transport_delta: f64,
    pub energy_delta: f64,
    /// 相对基准的百分比变化（基准合计为 0 时为 None）
    pub percent_change: Option<f64>,
    pub key_deltas: Vec<KeyDelta>,
}

impl ScenarioComparison {
    /// 备选方案是否减排
    pub fn is_reduction(&self) -> bool {
        self.total_delta < 0.0
    }

    /// 变化量最大的分项（按绝对值）
    pub fn largest_change(&self) -> Option<&KeyDelta> {
        self.key_deltas
            .iter()
            .max_by(|a, b| a.delta.abs().total_cmp(&b.delta.abs()))
    }
}

/// 对比两个计算结果
///
/// key_deltas 覆盖两侧分项键的并集,缺失一侧按 0 计;
/// 顺序为 材料 → 运输 → 能源,类别内按键升序
pub fn compare(baseline: &CalculationResult, candidate: &CalculationResult) -> ScenarioComparison {
    let mut key_deltas = Vec::new();

    for category in EmissionCategory::ALL {
        let before_map = baseline.breakdown(category);
        let after_map = candidate.breakdown(category);
        let keys: BTreeSet<&String> = before_map.keys().chain(after_map.keys()).collect();

        for key in keys {
            let before = before_map.get(key).copied().unwrap_or(0.0);
            let after = after_map.get(key).copied().unwrap_or(0.0);
            key_deltas.push(KeyDelta {
                category,
                key: key.clone(),
                before,
                after,
                delta: after - before,
            });
        }
    }

    let total_delta = candidate.total_emissions - baseline.total_emissions;
    let percent_change = if baseline.total_emissions == 0.0 {
        None
    } else {
        Some(total_delta / baseline.total_emissions * 100.0)
    };

    ScenarioComparison {
        baseline_total: baseline.total_emissions,
        candidate_total: candidate.total_emissions,
        total_delta,
        material_delta: candidate.material_emissions - baseline.material_emissions,
        transport_delta: candidate.transport_emissions - baseline.transport_emissions,
        energy_delta: candidate.energy_emissions - baseline.energy_emissions,
        percent_change,
        key_deltas,
    }
}
