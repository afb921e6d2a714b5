// ==========================================
// 建筑碳排放计算引擎 - 文件因子来源
// ==========================================
// 支持: .json / .csv / .xlsx / .xls
// 文件解析为阻塞 I/O,放入 blocking 线程池执行
// ==========================================

use crate::domain::factor::FactorTables;
use crate::importer::factor_importer::FactorSheetImporter;
use crate::provider::error::ProviderResult;
use crate::provider::factor_provider::FactorTableProvider;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileFactorProvider {
    path: PathBuf,
}

impl FileFactorProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FactorTableProvider for FileFactorProvider {
    fn source_name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn load_tables(&self) -> ProviderResult<FactorTables> {
        let path = self.path.clone();
        let tables =
            tokio::task::spawn_blocking(move || FactorSheetImporter::new().import_file(&path))
                .await??;
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::error::ProviderError;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_csv_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "category,key,display_name,factor,unit").unwrap();
        writeln!(file, "material,concrete,Concrete,0.107,kg").unwrap();
        writeln!(file, "energy,electricity,Grid,0.94,kWh").unwrap();
        file.flush().unwrap();

        let provider = FileFactorProvider::new(file.path());
        let tables = provider.load_tables().await.unwrap();

        assert_eq!(tables.materials.len(), 1);
        assert_eq!(tables.energy.get("electricity").unwrap().factor, 0.94);
        assert!(provider.source_name().starts_with("file:"));
    }

    #[tokio::test]
    async fn test_missing_file_is_import_error() {
        let provider = FileFactorProvider::new("/nonexistent/factors.csv");
        let err = provider.load_tables().await.unwrap_err();
        assert!(matches!(err, ProviderError::Import(_)));
    }
}
