// ==========================================
// 建筑碳排放计算引擎 - 内置默认因子表
// ==========================================
// 用途: 未配置外部因子来源时的兜底数据
// 单位: kg CO2e / 计量单位
// ==========================================

use crate::domain::factor::{EmissionFactor, FactorTable, FactorTables};
use crate::provider::error::ProviderResult;
use crate::provider::factor_provider::FactorTableProvider;
use async_trait::async_trait;
use std::sync::OnceLock;

static BUILTIN_TABLES: OnceLock<FactorTables> = OnceLock::new();

// (key, display_name, factor, unit)
const MATERIAL_FACTORS: &[(&str, &str, f64, &str)] = &[
    ("concrete", "Concrete (32 MPa)", 0.107, "kg"),
    ("steel", "Structural steel", 1.55, "kg"),
    ("rebar", "Reinforcing bar", 1.99, "kg"),
    ("timber", "Softwood timber", 0.45, "kg"),
    ("aluminium", "Aluminium extrusion", 8.24, "kg"),
    ("glass", "Float glass", 1.44, "kg"),
    ("brick", "Clay brick", 0.24, "kg"),
    ("plasterboard", "Plasterboard", 0.39, "kg"),
    ("insulation", "Glasswool insulation", 1.86, "kg"),
];

const TRANSPORT_FACTORS: &[(&str, &str, f64, &str)] = &[
    ("truck", "Rigid truck", 0.21, "km"),
    ("light_truck", "Light commercial vehicle", 0.14, "km"),
    ("heavy_truck", "Articulated truck", 0.32, "km"),
    ("rail", "Freight rail", 0.028, "km"),
    ("ship", "Coastal shipping", 0.016, "km"),
];

const ENERGY_FACTORS: &[(&str, &str, f64, &str)] = &[
    ("electricity", "Grid electricity", 0.94, "kWh"),
    ("diesel", "Diesel", 2.68, "L"),
    ("petrol", "Petrol", 2.31, "L"),
    ("natural_gas", "Natural gas", 0.0514, "MJ"),
    ("lpg", "LPG", 1.51, "L"),
    ("solar", "On-site solar", 0.0, "kWh"),
];

/// 内置因子表（进程内只构建一次）
pub fn builtin_tables() -> &'static FactorTables {
    BUILTIN_TABLES.get_or_init(|| {
        FactorTables::new(
            build_table(MATERIAL_FACTORS),
            build_table(TRANSPORT_FACTORS),
            build_table(ENERGY_FACTORS),
        )
    })
}

fn build_table(rows: &[(&str, &str, f64, &str)]) -> FactorTable {
    let entries = rows
        .iter()
        .map(|(key, name, factor, unit)| (*key, EmissionFactor::new(*name, *factor, *unit)));
    // 常量数据在测试中校验,此处失败只可能是编码错误
    FactorTable::from_entries(entries).unwrap_or_else(|e| {
        tracing::error!(error = %e, "内置因子表数据不合法");
        FactorTable::empty()
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFactorProvider;

impl BuiltinFactorProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactorTableProvider for BuiltinFactorProvider {
    fn source_name(&self) -> String {
        "builtin".to_string()
    }

    async fn load_tables(&self) -> ProviderResult<FactorTables> {
        Ok(builtin_tables().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EmissionCategory;

    #[test]
    fn test_builtin_tables_complete() {
        let tables = builtin_tables();
        assert_eq!(tables.materials.len(), MATERIAL_FACTORS.len());
        assert_eq!(tables.transport.len(), TRANSPORT_FACTORS.len());
        assert_eq!(tables.energy.len(), ENERGY_FACTORS.len());
    }

    #[test]
    fn test_builtin_reference_values() {
        let tables = builtin_tables();
        let concrete = tables
            .lookup(EmissionCategory::Material, "concrete")
            .into_option()
            .unwrap();
        assert_eq!(concrete.factor, 0.107);
        assert_eq!(concrete.unit, "kg");

        let electricity = tables.energy.get("electricity").unwrap();
        assert_eq!(electricity.factor, 0.94);
    }

    #[tokio::test]
    async fn test_provider_returns_builtin() {
        let tables = BuiltinFactorProvider::new().load_tables().await.unwrap();
        assert_eq!(&tables, builtin_tables());
    }
}
