// ==========================================
// 排放计算引擎测试
// ==========================================
// 场景: 参考算例、空输入、同键累加、未知键、运输口径
// ==========================================


use carbon_construct::domain::factor::{EmissionFactor, FactorTable, FactorTables};
use carbon_construct::domain::input::CalculationInput;
use carbon_construct::domain::types::{EmissionCategory, TransportBasis};
use carbon_construct::engine::{calculate, CalculationError, EmissionCalculator};
use test_helpers::sample_tables;

// ==========================================
// 参考算例
// ==========================================

#[test]
fn test_concrete_reference_scenario() {
    let factors = FactorTables::new(
        FactorTable::from_entries(vec![("concrete", EmissionFactor::new("Concrete", 0.107, "kg"))])
            .unwrap(),
        FactorTable::empty(),
        FactorTable::empty(),
    );
    let input = CalculationInput::new().with_material("concrete", 100.0);

    let result = calculate(&input, &factors).unwrap();

    assert_eq!(result.material_emissions, 10.7);
    assert_eq!(result.total_emissions, 10.7);
    assert_eq!(result.breakdown_by_material.len(), 1);
    assert_eq!(result.breakdown_by_material["concrete"], 10.7);
    assert!(result.breakdown_by_transport.is_empty());
    assert!(result.breakdown_by_energy.is_empty());
}

#[test]
fn test_electricity_reference_scenario() {
    let factors = FactorTables::new(
        FactorTable::empty(),
        FactorTable::empty(),
        FactorTable::from_entries(vec![(
            "electricity",
            EmissionFactor::new("Electricity", 0.94, "kWh"),
        )])
        .unwrap(),
    );
    let input = CalculationInput::new().with_energy("electricity", 50.0);

    let result = calculate(&input, &factors).unwrap();

    assert_eq!(result.energy_emissions, 47.0);
    assert_eq!(result.total_emissions, 47.0);
}

#[test]
fn test_empty_input_yields_zero() {
    let result = calculate(&CalculationInput::default(), &sample_tables()).unwrap();

    assert_eq!(result.material_emissions, 0.0);
    assert_eq!(result.transport_emissions, 0.0);
    assert_eq!(result.energy_emissions, 0.0);
    assert_eq!(result.total_emissions, 0.0);
    assert!(result.total_emissions.is_sign_positive());
    for category in EmissionCategory::ALL {
        assert!(result.breakdown(category).is_empty());
    }
}

#[test]
fn test_same_key_lines_accumulate() {
    let input = CalculationInput::new()
        .with_material("steel", 2.0)
        .with_material("concrete", 100.0)
        .with_material("steel", 4.0);

    let result = calculate(&input, &sample_tables()).unwrap();

    assert_eq!(result.breakdown_by_material.len(), 2);
    let steel = result.breakdown_by_material["steel"];
    assert!((steel - 1.55 * 6.0).abs() < 1e-12);
}

#[test]
fn test_zero_quantity_key_still_listed() {
    let input = CalculationInput::new().with_energy("diesel", 0.0);
    let result = calculate(&input, &sample_tables()).unwrap();
    assert_eq!(result.breakdown_by_energy.get("diesel"), Some(&0.0));
}

// ==========================================
// 未知键
// ==========================================

#[test]
fn test_unknown_key_fails_closed() {
    let input = CalculationInput::new()
        .with_material("concrete", 10.0)
        .with_energy("geothermal", 10.0);

    let err = calculate(&input, &sample_tables()).unwrap_err();

    assert_eq!(
        err,
        CalculationError::UnknownFactorKey {
            category: EmissionCategory::Energy,
            key: "geothermal".to_string(),
        }
    );
}

#[test]
fn test_unknown_key_reported_in_category_order() {
    let input = CalculationInput::new()
        .with_energy("geothermal", 1.0)
        .with_transport("zeppelin", 10.0, 1.0)
        .with_material("concrete", 1.0);

    let err = calculate(&input, &sample_tables()).unwrap_err();

    assert!(matches!(
        err,
        CalculationError::UnknownFactorKey { category: EmissionCategory::Transport, .. }
    ));
}

#[test]
fn test_key_lookup_is_per_category() {
    // 能源键不能在材料表中使用
    let input = CalculationInput::new().with_material("electricity", 1.0);
    assert!(calculate(&input, &sample_tables()).is_err());
}

// ==========================================
// 运输口径
// ==========================================

#[test]
fn test_transport_bases() {
    let input = CalculationInput::new().with_transport("truck", 100.0, 20_000.0);
    let tables = sample_tables();

    let by_distance = EmissionCalculator::with_transport_basis(TransportBasis::Distance)
        .calculate(&input, &tables)
        .unwrap();
    let by_tkm = EmissionCalculator::with_transport_basis(TransportBasis::TonneKilometre)
        .calculate(&input, &tables)
        .unwrap();

    assert!((by_distance.transport_emissions - 21.0).abs() < 1e-12);
    assert!((by_tkm.transport_emissions - 420.0).abs() < 1e-9);
}

#[test]
fn test_missing_weight_defaults_to_zero() {
    let input: CalculationInput =
        serde_json::from_str(r#"{"transport": [{"type": "rail", "distance": 500}]}"#).unwrap();
    assert_eq!(input.transport[0].weight, 0.0);

    let result = EmissionCalculator::with_transport_basis(TransportBasis::TonneKilometre)
        .calculate(&input, &sample_tables())
        .unwrap();
    assert_eq!(result.transport_emissions, 0.0);
}

// ==========================================
// 明细与序列化
// ==========================================

#[test]
fn test_detailed_line_items_follow_input() {
    let input = CalculationInput::new()
        .with_material("timber", 10.0)
        .with_transport("rail", 100.0, 0.0)
        .with_energy("electricity", 1.0);

    let detailed = EmissionCalculator::new()
        .calculate_detailed(&input, &sample_tables())
        .unwrap();

    let keys: Vec<&str> = detailed.line_items.iter().map(|l| l.key.as_str()).collect();
    assert_eq!(keys, vec!["timber", "rail", "electricity"]);
    assert_eq!(detailed.line_items[0].display_name, "Timber");
    assert_eq!(detailed.line_items[2].unit, "kWh");
}

#[test]
fn test_result_json_shape() {
    let input: CalculationInput = serde_json::from_str(
        r#"{"materials": [{"type": "concrete", "quantity": 100}],
            "energy": [{"type": "electricity", "amount": 50}]}"#,
    )
    .unwrap();

    let result = calculate(&input, &sample_tables()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["materialEmissions"], 10.7);
    assert_eq!(json["energyEmissions"], 47.0);
    assert_eq!(json["breakdownByMaterial"]["concrete"], 10.7);
    assert!(json["breakdownByTransport"].as_object().unwrap().is_empty());
}
