// ==========================================
// 建筑碳排放计算引擎 - 因子表字段映射器
// ==========================================
// 职责: 原始行记录 → FactorTables
// 列: category, key, display_name, factor, unit（支持中文别名）
// ==========================================

use crate::domain::factor::{EmissionFactor, FactorTable, FactorTables};
use crate::domain::types::EmissionCategory;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use std::collections::HashSet;

/// 表头所在行号,数据行从第 2 行开始
const FIRST_DATA_ROW: usize = 2;

pub struct FactorSheetMapper;

impl FactorSheetMapper {
    /// 映射原始行记录为三张因子表
    ///
    /// # 校验
    /// - category / key / factor 必填
    /// - factor 必须为非负有限数
    /// - 同一类别内 key 不能重复
    pub fn map_records(&self, records: &[RawRecord]) -> ImportResult<FactorTables> {
        let mut materials = Vec::new();
        let mut transport = Vec::new();
        let mut energy = Vec::new();
        let mut seen: HashSet<(EmissionCategory, String)> = HashSet::new();

        for (idx, row) in records.iter().enumerate() {
            let row_number = idx + FIRST_DATA_ROW;

            let category_raw = self.require_string(row, "category", row_number)?;
            let category = category_raw
                .parse::<EmissionCategory>()
                .map_err(|_| ImportError::UnknownCategory {
                    row: row_number,
                    value: category_raw.clone(),
                })?;

            let key = self.require_string(row, "key", row_number)?;
            let factor = self.parse_factor(row, row_number)?;
            let display_name = self
                .get_string(row, "display_name")
                .unwrap_or_else(|| key.clone());
            let unit = self.get_string(row, "unit").unwrap_or_default();

            if !seen.insert((category, key.clone())) {
                return Err(ImportError::DuplicateKey {
                    row: row_number,
                    category: category.to_string(),
                    key,
                });
            }

            let entry = (key, EmissionFactor::new(display_name, factor, unit));
            match category {
                EmissionCategory::Material => materials.push(entry),
                EmissionCategory::Transport => transport.push(entry),
                EmissionCategory::Energy => energy.push(entry),
            }
        }

        Ok(FactorTables::new(
            build_table(materials)?,
            build_table(transport)?,
            build_table(energy)?,
        ))
    }

    /// 提取字符串字段，支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRecord, field: &str) -> Option<String> {
        let aliases: &[&str] = match field {
            "category" => &["category", "类别", "分类"],
            "key" => &["key", "type", "键", "因子键", "代码"],
            "display_name" => &["display_name", "displayName", "name", "名称", "显示名称"],
            "factor" => &["factor", "排放因子", "因子"],
            "unit" => &["unit", "单位"],
            _ => &[],
        };

        aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    fn require_string(&self, row: &RawRecord, field: &str, row_number: usize) -> ImportResult<String> {
        self.get_string(row, field)
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: field.to_string(),
            })
    }

    fn parse_factor(&self, row: &RawRecord, row_number: usize) -> ImportResult<f64> {
        let raw = self.require_string(row, "factor", row_number)?;
        let value = raw
            .replace(',', "")
            .parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row: row_number,
                field: "factor".to_string(),
                message: format!("{} ({})", e, raw),
            })?;

        if !value.is_finite() || value < 0.0 {
            return Err(ImportError::InvalidFactor {
                row: row_number,
                message: format!("排放因子必须为非负有限数，实际 {}", raw),
            });
        }
        Ok(value)
    }
}

fn build_table(entries: Vec<(String, EmissionFactor)>) -> ImportResult<FactorTable> {
    FactorTable::from_entries(entries).map_err(|e| ImportError::InvalidFactor {
        row: 0,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_records_splits_categories() {
        let records = vec![
            row(&[("category", "material"), ("key", "concrete"), ("display_name", "Concrete"), ("factor", "0.107"), ("unit", "kg")]),
            row(&[("category", "transport"), ("key", "truck"), ("factor", "0.21"), ("unit", "km")]),
            row(&[("category", "energy"), ("key", "electricity"), ("factor", "0.94"), ("unit", "kWh")]),
        ];

        let tables = FactorSheetMapper.map_records(&records).unwrap();

        assert_eq!(tables.total_entries(), 3);
        assert_eq!(tables.materials.get("concrete").unwrap().display_name, "Concrete");
        // 缺省显示名称回退为键
        assert_eq!(tables.transport.get("truck").unwrap().display_name, "truck");
    }

    #[test]
    fn test_chinese_header_aliases() {
        let records = vec![row(&[("类别", "材料"), ("键", "steel"), ("名称", "钢材"), ("排放因子", "1.55"), ("单位", "kg")])];

        let tables = FactorSheetMapper.map_records(&records).unwrap();

        let steel = tables.materials.get("steel").unwrap();
        assert_eq!(steel.display_name, "钢材");
        assert_eq!(steel.factor, 1.55);
    }

    #[test]
    fn test_row_numbers_in_errors() {
        let records = vec![
            row(&[("category", "material"), ("key", "concrete"), ("factor", "0.107")]),
            row(&[("category", "water"), ("key", "tap"), ("factor", "0.001")]),
        ];
        let err = FactorSheetMapper.map_records(&records).unwrap_err();
        assert!(matches!(err, ImportError::UnknownCategory { row: 3, .. }));

        let records = vec![row(&[("category", "energy"), ("key", "diesel"), ("factor", "-2.68")])];
        let err = FactorSheetMapper.map_records(&records).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFactor { row: 2, .. }));

        let records = vec![row(&[("category", "energy"), ("key", "diesel"), ("factor", "abc")])];
        let err = FactorSheetMapper.map_records(&records).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 2, .. }));
    }

    #[test]
    fn test_duplicate_key_within_category() {
        let records = vec![
            row(&[("category", "material"), ("key", "glass"), ("factor", "1.44")]),
            row(&[("category", "energy"), ("key", "glass"), ("factor", "0.5")]),
            row(&[("category", "material"), ("key", "glass"), ("factor", "1.50")]),
        ];

        let err = FactorSheetMapper.map_records(&records).unwrap_err();

        assert!(matches!(err, ImportError::DuplicateKey { row: 4, ref key, .. } if key == "glass"));
    }

    #[test]
    fn test_missing_factor_field() {
        let records = vec![row(&[("category", "material"), ("key", "timber")])];
        let err = FactorSheetMapper.map_records(&records).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 2, ref field } if field == "factor"));
    }
}
