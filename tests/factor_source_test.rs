// ==========================================
// 因子来源与因子导入集成测试
// ==========================================
// 测试目标: 文件/SQLite 来源、目录单次加载、因子表导入因子库
// ==========================================


use async_trait::async_trait;
use carbon_construct::api::FactorApi;
use carbon_construct::config::FactorSource;
use carbon_construct::domain::factor::FactorTables;
use carbon_construct::logging;
use carbon_construct::importer::{FactorSheetImporter, ImportError};
use carbon_construct::provider::{
    FactorCatalog, FactorTableProvider, FileFactorProvider, ProviderResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::{sample_tables, write_factor_csv};

// ==========================================
// 文件导入
// ==========================================

#[test]
fn test_chinese_headers_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("因子表.csv");
    std::fs::write(
        &path,
        "类别,因子键,名称,排放因子,单位\n材料,concrete,混凝土,0.107,kg\n能源,electricity,电网电力,0.94,kWh\n",
    )
    .unwrap();

    let tables = FactorSheetImporter::new().import_file(&path).unwrap();

    assert_eq!(tables.materials.get("concrete").unwrap().display_name, "混凝土");
    assert_eq!(tables.energy.get("electricity").unwrap().factor, 0.94);
}

#[test]
fn test_duplicate_key_reports_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_factor_csv(
        dir.path(),
        "dup.csv",
        &[
            "material,steel,Steel,1.55,kg",
            "transport,truck,Truck,0.21,km",
            "material,steel,Steel (recycled),0.6,kg",
        ],
    );

    let err = FactorSheetImporter::new().import_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::DuplicateKey { row: 4, .. }));
}

#[test]
fn test_negative_factor_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_factor_csv(dir.path(), "neg.csv", &["energy,solar,Solar,-0.1,kWh"]);

    let err = FactorSheetImporter::new().import_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::InvalidFactor { row: 2, .. }));
}

#[test]
fn test_json_factor_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("factors.json");
    std::fs::write(&path, serde_json::to_string(&sample_tables()).unwrap()).unwrap();

    let tables = FactorSheetImporter::new().import_file(&path).unwrap();
    assert_eq!(tables, sample_tables());
}

// ==========================================
// 来源与目录
// ==========================================

#[tokio::test]
async fn test_file_provider_reads_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("factors.json");
    std::fs::write(&path, serde_json::to_string(&sample_tables()).unwrap()).unwrap();

    let tables = FileFactorProvider::new(&path).load_tables().await.unwrap();
    assert_eq!(tables, sample_tables());
}

#[tokio::test]
async fn test_builtin_catalog_from_default_source() {
    let catalog = FactorCatalog::from_source(&FactorSource::default());
    assert_eq!(catalog.source_name(), "builtin");

    let tables = catalog.tables().await.unwrap();
    assert!(tables.materials.contains_key("concrete"));
    assert!(tables.transport.contains_key("truck"));
    assert!(tables.energy.contains_key("electricity"));
}

struct SlowProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FactorTableProvider for SlowProvider {
    fn source_name(&self) -> String {
        "slow".to_string()
    }

    async fn load_tables(&self) -> ProviderResult<FactorTables> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        Ok(sample_tables())
    }
}

#[tokio::test]
async fn test_concurrent_first_use_loads_once() {
    logging::init_test();
    let calls = Arc::new(AtomicUsize::new(0));
    let catalog = Arc::new(FactorCatalog::new(Box::new(SlowProvider {
        calls: calls.clone(),
    })));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.tables().await.map(|t| t.total_entries()) })
        })
        .collect();

    for handle in futures::future::join_all(handles).await {
        assert_eq!(handle.unwrap().unwrap(), 7);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ==========================================
// 因子库导入
// ==========================================

#[tokio::test]
async fn test_import_sheet_replaces_db_contents() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("factors.db");
    let api = FactorApi::new(db_path.to_string_lossy().to_string());

    let first = write_factor_csv(
        dir.path(),
        "v1.csv",
        &["material,steel,Steel,1.55,kg", "material,glass,Glass,1.44,kg"],
    );
    api.import_factor_sheet(&first).await.unwrap();

    let second = write_factor_csv(dir.path(), "v2.csv", &["material,steel,Steel,1.46,kg"]);
    let response = api.import_factor_sheet(&second).await.unwrap();
    assert_eq!(response.written, 1);

    let tables = api.export_tables().unwrap();
    assert_eq!(tables.materials.len(), 1);
    assert_eq!(tables.materials.get("steel").unwrap().factor, 1.46);
}
