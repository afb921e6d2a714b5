// ==========================================
// 建筑碳排放计算引擎 - 因子表目录
// ==========================================
// 职责: 首次使用时加载因子表,之后只读共享
// 加载失败不缓存,下次调用重新尝试
// ==========================================

use crate::config::app_config::FactorSource;
use crate::domain::factor::FactorTables;
use crate::provider::builtin::BuiltinFactorProvider;
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::factor_provider::FactorTableProvider;
use crate::provider::file::FileFactorProvider;
use crate::provider::sqlite::SqliteFactorProvider;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct FactorCatalog {
    provider: Box<dyn FactorTableProvider>,
    tables: OnceCell<Arc<FactorTables>>,
}

impl FactorCatalog {
    pub fn new(provider: Box<dyn FactorTableProvider>) -> Self {
        Self {
            provider,
            tables: OnceCell::new(),
        }
    }

    /// 按配置的来源创建目录
    pub fn from_source(source: &FactorSource) -> Self {
        let provider: Box<dyn FactorTableProvider> = match source {
            FactorSource::Builtin => Box::new(BuiltinFactorProvider::new()),
            FactorSource::File { path } => Box::new(FileFactorProvider::new(path.clone())),
            FactorSource::Sqlite { path } => Box::new(SqliteFactorProvider::new(path.clone())),
        };
        Self::new(provider)
    }

    /// 直接注入已加载的因子表
    pub fn preloaded(tables: FactorTables) -> Self {
        Self {
            provider: Box::new(BuiltinFactorProvider::new()),
            tables: OnceCell::new_with(Some(Arc::new(tables))),
        }
    }

    pub fn source_name(&self) -> String {
        self.provider.source_name()
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.initialized()
    }

    /// 获取因子表（首次调用触发加载）
    pub async fn tables(&self) -> ProviderResult<Arc<FactorTables>> {
        let tables = self
            .tables
            .get_or_try_init(|| async {
                let source = self.provider.source_name();
                tracing::info!(source = %source, "开始加载排放因子表");

                let tables = self.provider.load_tables().await.map_err(|e| {
                    tracing::error!(source = %source, error = %e, "排放因子表加载失败");
                    e
                })?;

                tracing::info!(
                    source = %source,
                    entries = tables.total_entries(),
                    "排放因子表加载完成"
                );
                Ok::<_, ProviderError>(Arc::new(tables))
            })
            .await?;
        Ok(Arc::clone(tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 前 fail_times 次失败,之后返回空表
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail_times: usize,
    }

    #[async_trait]
    impl FactorTableProvider for CountingProvider {
        fn source_name(&self) -> String {
            "counting".to_string()
        }

        async fn load_tables(&self) -> ProviderResult<FactorTables> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_times {
                return Err(ProviderError::TaskFailed("unavailable".to_string()));
            }
            Ok(FactorTables::default())
        }
    }

    #[tokio::test]
    async fn test_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = FactorCatalog::new(Box::new(CountingProvider {
            calls: calls.clone(),
            fail_times: 0,
        }));

        assert!(!catalog.is_loaded());
        let first = catalog.tables().await.unwrap();
        let second = catalog.tables().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(catalog.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let catalog = FactorCatalog::new(Box::new(CountingProvider {
            calls: calls.clone(),
            fail_times: 1,
        }));

        assert!(catalog.tables().await.is_err());
        assert!(!catalog.is_loaded());
        assert!(catalog.tables().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded_skips_provider() {
        let catalog = FactorCatalog::preloaded(FactorTables::default());
        assert!(catalog.is_loaded());
        assert_eq!(catalog.tables().await.unwrap().total_entries(), 0);
    }
}
