// ==========================================
// 建筑碳排放计算引擎 - SQLite 因子来源
// ==========================================

use crate::domain::factor::FactorTables;
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::factor_provider::FactorTableProvider;
use crate::repository::factor_repo::EmissionFactorRepository;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct SqliteFactorProvider {
    db_path: PathBuf,
}

impl SqliteFactorProvider {
    pub fn new<P: Into<PathBuf>>(db_path: P) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[async_trait]
impl FactorTableProvider for SqliteFactorProvider {
    fn source_name(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }

    async fn load_tables(&self) -> ProviderResult<FactorTables> {
        // 只读路径不建库: 路径写错时报错,而不是留下一个空库文件
        if !self.db_path.is_file() {
            return Err(ProviderError::DatabaseNotFound {
                path: self.db_path.display().to_string(),
            });
        }

        let db_path = self.db_path.to_string_lossy().to_string();
        let source_name = self.source_name();

        let tables = tokio::task::spawn_blocking(move || {
            let repo = EmissionFactorRepository::new(&db_path)?;
            repo.load_tables()
        })
        .await??;

        // 空库视为来源不可用,避免所有键都被判为未知
        if tables.total_entries() == 0 {
            return Err(ProviderError::EmptyTables { source_name });
        }
        Ok(tables)
    }
}
