// ==========================================
// 建筑碳排放计算引擎 - 因子表管理API
// ==========================================
// 职责: 因子表文件 → SQLite 因子库的导入、因子库导出
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::factor::FactorTables;
use crate::importer::factor_importer::FactorSheetImporter;
use crate::repository::factor_repo::EmissionFactorRepository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// 因子导入响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorImportResponse {
    pub materials: usize,
    pub transport: usize,
    pub energy: usize,
    /// 写入因子库的总条数
    pub written: usize,
    pub elapsed_ms: i64,
}

/// 因子表管理API
pub struct FactorApi {
    db_path: String,
}

impl FactorApi {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 导入因子表文件并整体替换因子库
    ///
    /// # 参数
    /// - file_path: .json / .csv / .xlsx / .xls 因子表
    ///
    /// # 返回
    /// - Ok(FactorImportResponse): 各类别条数与耗时
    /// - Err(ApiError): 文件解析失败或写库失败（写库失败时整个事务回滚）
    pub async fn import_factor_sheet(&self, file_path: &Path) -> ApiResult<FactorImportResponse> {
        let start = Instant::now();
        let file_path = file_path.to_path_buf();
        let db_path = self.db_path.clone();

        let (tables, written) = tokio::task::spawn_blocking(move || -> ApiResult<_> {
            let tables = FactorSheetImporter::new().import_file(&file_path)?;
            let repo = EmissionFactorRepository::new(&db_path)?;
            let written = repo.replace_all(&tables)?;
            Ok((tables, written))
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))??;

        let response = FactorImportResponse {
            materials: tables.materials.len(),
            transport: tables.transport.len(),
            energy: tables.energy.len(),
            written,
            elapsed_ms: start.elapsed().as_millis() as i64,
        };

        tracing::info!(
            db_path = %self.db_path,
            written = response.written,
            elapsed_ms = response.elapsed_ms,
            "因子表已导入因子库"
        );
        Ok(response)
    }

    /// 读取因子库中的全部因子
    pub fn export_tables(&self) -> ApiResult<FactorTables> {
        let repo = EmissionFactorRepository::new(&self.db_path)?;
        Ok(repo.load_tables()?)
    }
}
