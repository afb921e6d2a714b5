// ==========================================
// 建筑碳排放计算引擎 - 因子表导入器
// ==========================================
// 导入流程:
// 1. 按扩展名选择解析方式（.json 直接反序列化）
// 2. 表格文件: 文件解析 → 字段映射
// 3. 空表拒绝
// ==========================================

use crate::domain::factor::FactorTables;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::factor_mapper::FactorSheetMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::fs;
use std::path::Path;

pub struct FactorSheetImporter {
    parser: UniversalFileParser,
    mapper: FactorSheetMapper,
}

impl FactorSheetImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FactorSheetMapper,
        }
    }

    /// 从文件导入三张因子表
    ///
    /// # 参数
    /// - path: .json / .csv / .xlsx / .xls 文件
    ///
    /// # 返回
    /// - Ok(FactorTables): 已校验的因子表
    /// - Err(ImportError): 文件、格式或数据质量错误
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<FactorTables> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let tables = if is_json {
            self.import_json(path)?
        } else {
            let records = self.parser.parse(path)?;
            tracing::debug!(
                path = %path.display(),
                rows = records.len(),
                "因子表文件解析完成"
            );
            self.mapper.map_records(&records)?
        };

        if tables.total_entries() == 0 {
            return Err(ImportError::EmptySheet(path.display().to_string()));
        }

        tracing::info!(
            path = %path.display(),
            materials = tables.materials.len(),
            transport = tables.transport.len(),
            energy = tables.energy.len(),
            "因子表导入完成"
        );
        Ok(tables)
    }

    fn import_json(&self, path: &Path) -> ImportResult<FactorTables> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Default for FactorSheetImporter {
    fn default() -> Self {
        Self::new()
    }
}
