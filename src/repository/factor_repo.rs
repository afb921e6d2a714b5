// ==========================================
// 建筑碳排放计算引擎 - 排放因子数据仓储
// ==========================================
// 表: emission_factor (category, factor_key) 主键
// 红线: Repository 不含计算逻辑
// ==========================================

use crate::db::{
    configure_sqlite_connection, ensure_schema, open_sqlite_connection, warn_on_schema_mismatch,
};
use crate::domain::factor::{EmissionFactor, FactorTable, FactorTables};
use crate::domain::types::EmissionCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// EmissionFactorRepository - 排放因子仓储
// ==========================================

/// 排放因子仓储
/// 职责: 管理 emission_factor 表的读写
pub struct EmissionFactorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmissionFactorRepository {
    /// 创建新的排放因子仓储实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;
        warn_on_schema_mismatch(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存库（测试/临时计算使用）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（幂等）
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        ensure_schema(&conn)?;
        Ok(())
    }

    /// 写入或更新单条因子
    pub fn upsert(
        &self,
        category: EmissionCategory,
        key: &str,
        factor: &EmissionFactor,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert_row(&conn, category, key, factor)?;
        Ok(())
    }

    /// 以给定因子表整体替换库中数据（事务化）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn replace_all(&self, tables: &FactorTables) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM emission_factor", [])?;

        let mut count = 0;
        for category in EmissionCategory::ALL {
            for (key, factor) in tables.table(category).iter() {
                upsert_row(&tx, category, key, factor)?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::info!(count, "排放因子表已整体替换");
        Ok(count)
    }

    /// 查询单条因子
    pub fn find(
        &self,
        category: EmissionCategory,
        key: &str,
    ) -> RepositoryResult<Option<EmissionFactor>> {
        let conn = self.get_conn()?;
        let factor = conn
            .query_row(
                "SELECT display_name, factor, unit FROM emission_factor
                 WHERE category = ?1 AND factor_key = ?2",
                params![category.as_str(), key],
                |row| {
                    Ok(EmissionFactor {
                        display_name: row.get(0)?,
                        factor: row.get(1)?,
                        unit: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(factor)
    }

    /// 读取全部因子并组装三张因子表
    pub fn load_tables(&self) -> RepositoryResult<FactorTables> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, factor_key, display_name, factor, unit
             FROM emission_factor
             ORDER BY category, factor_key",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                EmissionFactor {
                    display_name: row.get(2)?,
                    factor: row.get(3)?,
                    unit: row.get(4)?,
                },
            ))
        })?;

        let mut materials = Vec::new();
        let mut transport = Vec::new();
        let mut energy = Vec::new();
        for row in rows {
            let (category, key, factor) = row?;
            let category = category.parse::<EmissionCategory>().map_err(|message| {
                RepositoryError::FieldValueError {
                    field: "category".to_string(),
                    message,
                }
            })?;
            match category {
                EmissionCategory::Material => materials.push((key, factor)),
                EmissionCategory::Transport => transport.push((key, factor)),
                EmissionCategory::Energy => energy.push((key, factor)),
            }
        }

        Ok(FactorTables::new(
            to_table(materials)?,
            to_table(transport)?,
            to_table(energy)?,
        ))
    }

    /// 因子总条数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM emission_factor", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn upsert_row(
    conn: &Connection,
    category: EmissionCategory,
    key: &str,
    factor: &EmissionFactor,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO emission_factor (category, factor_key, display_name, factor, unit, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(category, factor_key) DO UPDATE SET
             display_name = excluded.display_name,
             factor = excluded.factor,
             unit = excluded.unit,
             updated_at = excluded.updated_at",
        params![
            category.as_str(),
            key,
            factor.display_name,
            factor.factor,
            factor.unit,
            Utc::now().to_rfc3339(),
        ],
    )
}

fn to_table(entries: Vec<(String, EmissionFactor)>) -> RepositoryResult<FactorTable> {
    FactorTable::from_entries(entries).map_err(|e| RepositoryError::FieldValueError {
        field: "factor".to_string(),
        message: e.to_string(),
    })
}
