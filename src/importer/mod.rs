// ==========================================
// 建筑碳排放计算引擎 - 导入层
// ==========================================
// 职责: 外部因子表文件导入,生成 FactorTables
// 支持: JSON, CSV, Excel
// ==========================================

pub mod error;
pub mod factor_importer;
pub mod factor_mapper;
pub mod file_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use factor_importer::FactorSheetImporter;
pub use factor_mapper::FactorSheetMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
