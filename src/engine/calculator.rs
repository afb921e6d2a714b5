// ==========================================
// 建筑碳排放计算引擎 - 排放计算器
// ==========================================
// 输入: CalculationInput + FactorTables
// 输出: CalculationResult（合计 + 分类明细）
// 红线: 纯函数,无 I/O,无日志,不持有调用间状态
// ==========================================

use crate::domain::factor::{FactorLookup, FactorTable, FactorTables};
use crate::domain::input::CalculationInput;
use crate::domain::result::{
    Breakdown, CalculationResult, DetailedCalculation, LineItemEmission,
};
use crate::domain::types::{EmissionCategory, TransportBasis};
use crate::engine::error::{CalculationError, EngineResult};
use std::collections::BTreeMap;

/// 千克 → 吨
pub const KG_PER_TONNE: f64 = 1000.0;

// ==========================================
// EmissionCalculator - 排放计算器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EmissionCalculator {
    transport_basis: TransportBasis,
}

impl EmissionCalculator {
    /// 默认口径（运输按距离计算）
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport_basis(transport_basis: TransportBasis) -> Self {
        Self { transport_basis }
    }

    pub fn transport_basis(&self) -> TransportBasis {
        self.transport_basis
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算排放汇总
    ///
    /// # 参数
    /// - `input`: 计算输入（数值范围由调用方保证）
    /// - `factors`: 三张因子表
    ///
    /// # 返回
    /// - Ok(CalculationResult): 合计与分类明细
    /// - Err(UnknownFactorKey): 任一行引用了因子表中不存在的键
    pub fn calculate(
        &self,
        input: &CalculationInput,
        factors: &FactorTables,
    ) -> EngineResult<CalculationResult> {
        Ok(self.calculate_detailed(input, factors)?.result)
    }

    /// 计算排放汇总 + 行项目明细
    ///
    /// 未知键的检查顺序: 材料 → 运输 → 能源,类别内按列表顺序
    pub fn calculate_detailed(
        &self,
        input: &CalculationInput,
        factors: &FactorTables,
    ) -> EngineResult<DetailedCalculation> {
        let mut line_items = Vec::with_capacity(input.line_count());

        // 1. 材料: factor × quantity
        let (material_emissions, breakdown_by_material) = accumulate_category(
            EmissionCategory::Material,
            &factors.materials,
            input
                .materials
                .iter()
                .map(|m| (m.kind.as_str(), m.quantity)),
            &mut line_items,
        )?;

        // 2. 运输: 依口径折算活动量
        let basis = self.transport_basis;
        let (transport_emissions, breakdown_by_transport) = accumulate_category(
            EmissionCategory::Transport,
            &factors.transport,
            input
                .transport
                .iter()
                .map(|t| (t.kind.as_str(), transport_activity(basis, t.distance, t.weight))),
            &mut line_items,
        )?;

        // 3. 能源: factor × amount
        let (energy_emissions, breakdown_by_energy) = accumulate_category(
            EmissionCategory::Energy,
            &factors.energy,
            input.energy.iter().map(|e| (e.kind.as_str(), e.amount)),
            &mut line_items,
        )?;

        let total_emissions = material_emissions + transport_emissions + energy_emissions;

        Ok(DetailedCalculation {
            result: CalculationResult {
                material_emissions,
                transport_emissions,
                energy_emissions,
                total_emissions,
                breakdown_by_material,
                breakdown_by_transport,
                breakdown_by_energy,
            },
            line_items,
        })
    }
}

/// 以默认口径计算排放汇总
pub fn calculate(input: &CalculationInput, factors: &FactorTables) -> EngineResult<CalculationResult> {
    EmissionCalculator::new().calculate(input, factors)
}

/// 运输活动量
///
/// - Distance: distance
/// - TonneKilometre: distance × weight(kg) / 1000
pub fn transport_activity(basis: TransportBasis, distance: f64, weight: f64) -> f64 {
    match basis {
        TransportBasis::Distance => distance,
        TransportBasis::TonneKilometre => distance * weight / KG_PER_TONNE,
    }
}

// ==========================================
// 类别累加
// ==========================================

/// 累加单个类别
///
/// 同键贡献先按数值排序再求和,类别合计为明细按键序求和;
/// 因此行项目的排列顺序不影响任何输出字段
fn accumulate_category<'a, I>(
    category: EmissionCategory,
    table: &FactorTable,
    lines: I,
    line_items: &mut Vec<LineItemEmission>,
) -> EngineResult<(f64, Breakdown)>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut contributions: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for (index, (key, activity)) in lines.enumerate() {
        let factor = match table.lookup(key) {
            FactorLookup::Found(factor) => factor,
            FactorLookup::NotFound(key) => {
                return Err(CalculationError::UnknownFactorKey { category, key });
            }
        };

        let emissions = factor.factor * activity;
        contributions
            .entry(key.to_string())
            .or_default()
            .push(emissions);

        line_items.push(LineItemEmission {
            category,
            index,
            key: key.to_string(),
            display_name: factor.display_name.clone(),
            unit: factor.unit.clone(),
            emissions,
        });
    }

    let mut breakdown = Breakdown::new();
    for (key, mut values) in contributions {
        values.sort_by(|a, b| a.total_cmp(b));
        breakdown.insert(key, values.iter().fold(0.0, |acc, v| acc + v));
    }
    let total = breakdown.values().fold(0.0, |acc, v| acc + v);

    Ok((total, breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factor::EmissionFactor;

    fn tables() -> FactorTables {
        FactorTables::new(
            FactorTable::from_entries(vec![
                ("concrete", EmissionFactor::new("Concrete", 0.107, "kg")),
                ("steel", EmissionFactor::new("Steel", 1.55, "kg")),
            ])
            .unwrap(),
            FactorTable::from_entries(vec![("truck", EmissionFactor::new("Truck", 0.21, "km"))])
                .unwrap(),
            FactorTable::from_entries(vec![(
                "electricity",
                EmissionFactor::new("Grid electricity", 0.94, "kWh"),
            )])
            .unwrap(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_concrete_scenario() {
        let input = CalculationInput::new().with_material("concrete", 100.0);
        let result = calculate(&input, &tables()).unwrap();

        assert!(approx(result.material_emissions, 10.7));
        assert!(approx(result.total_emissions, 10.7));
        assert_eq!(result.breakdown_by_material.len(), 1);
        assert!(approx(result.breakdown_by_material["concrete"], 10.7));
        assert!(result.breakdown_by_transport.is_empty());
        assert!(result.breakdown_by_energy.is_empty());
    }

    #[test]
    fn test_electricity_scenario() {
        let input = CalculationInput::new().with_energy("electricity", 50.0);
        let result = calculate(&input, &tables()).unwrap();

        assert!(approx(result.energy_emissions, 47.0));
        assert!(approx(result.total_emissions, 47.0));
    }

    #[test]
    fn test_empty_input_yields_zeroes() {
        let result = calculate(&CalculationInput::new(), &tables()).unwrap();

        assert_eq!(result, CalculationResult::default());
        assert!(result.total_emissions.is_sign_positive());
    }

    #[test]
    fn test_unknown_key_fails_closed() {
        let input = CalculationInput::new()
            .with_material("concrete", 10.0)
            .with_transport("helicopter", 10.0, 1.0);
        let err = calculate(&input, &tables()).unwrap_err();

        assert_eq!(
            err,
            CalculationError::UnknownFactorKey {
                category: EmissionCategory::Transport,
                key: "helicopter".to_string(),
            }
        );
    }

    #[test]
    fn test_transport_distance_basis_ignores_weight() {
        let input = CalculationInput::new().with_transport("truck", 100.0, 20_000.0);
        let result = calculate(&input, &tables()).unwrap();

        assert!(approx(result.transport_emissions, 21.0));
    }

    #[test]
    fn test_transport_tonne_kilometre_basis() {
        let input = CalculationInput::new().with_transport("truck", 100.0, 20_000.0);
        let calculator = EmissionCalculator::with_transport_basis(TransportBasis::TonneKilometre);
        let result = calculator.calculate(&input, &tables()).unwrap();

        // 0.21 × 100 km × 20 t
        assert!(approx(result.transport_emissions, 420.0));
    }

    #[test]
    fn test_same_key_accumulates_into_one_bucket() {
        let input = CalculationInput::new()
            .with_material("steel", 2.0)
            .with_material("concrete", 10.0)
            .with_material("steel", 3.0);
        let detailed = EmissionCalculator::new()
            .calculate_detailed(&input, &tables())
            .unwrap();

        assert_eq!(detailed.result.breakdown_by_material.len(), 2);
        assert!(approx(detailed.result.breakdown_by_material["steel"], 1.55 * 5.0));
        assert_eq!(detailed.line_items.len(), 3);
        assert_eq!(detailed.line_items[2].index, 2);
        assert_eq!(detailed.line_items[2].display_name, "Steel");
    }

    #[test]
    fn test_out_of_range_values_do_not_panic() {
        let input = CalculationInput::new()
            .with_material("concrete", -5.0)
            .with_energy("electricity", f64::INFINITY);
        let result = calculate(&input, &tables()).unwrap();

        assert!(approx(result.material_emissions, -0.535));
        assert!(result.energy_emissions.is_infinite());
    }
}
