// ==========================================
// 查找表文本导入 - 交换文档 Repository（SQLite 后端）
// ==========================================
// 职责: 作为后端导入协作方，落库交换文档中的查找表
// 规则: 租户/法规按标识定位（不存在则创建）
//       查找表 Update → 先清空再写入；NoUpdate → 按条目标识合并
// 红线: Repository 不含行解析逻辑，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::exchange::Exchange;
use crate::domain::lookup::{LookupSet, LookupValue};
use crate::domain::types::UpdateMode;
use crate::importer::lookup_importer_trait::ExchangeImporter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use rust_decimal::Decimal;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// 一次查找表导入的批次记录
#[derive(Debug, Clone, PartialEq)]
pub struct LookupImportBatch {
    pub batch_id: String,
    pub lookup_name: String,
    pub update_mode: UpdateMode,
    pub value_count: usize,
    pub imported_at: DateTime<Utc>,
}

// ==========================================
// LookupExchangeRepository
// ==========================================
pub struct LookupExchangeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LookupExchangeRepository {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共用）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 共享底层连接
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 导入交换文档（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入的条目数
    pub fn import_exchange_blocking(&self, exchange: &Exchange) -> RepositoryResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut total = 0;
        for (tenant, regulation, lookup) in exchange.lookups() {
            let tenant_id = Self::ensure_tenant_tx(&tx, &tenant.identifier)?;
            let regulation_id = Self::ensure_regulation_tx(&tx, tenant_id, &regulation.name)?;
            let lookup_id = Self::ensure_lookup_tx(&tx, regulation_id, &lookup.name)?;
            total += Self::write_lookup_values_tx(&tx, lookup_id, lookup)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(total)
    }

    fn ensure_tenant_tx(tx: &Transaction, identifier: &str) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT OR IGNORE INTO tenant (identifier, created_at) VALUES (?1, ?2)",
            params![identifier, Utc::now().to_rfc3339()],
        )?;
        let id = tx.query_row(
            "SELECT tenant_id FROM tenant WHERE identifier = ?1",
            params![identifier],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn ensure_regulation_tx(tx: &Transaction, tenant_id: i64, name: &str) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT OR IGNORE INTO regulation (tenant_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![tenant_id, name, Utc::now().to_rfc3339()],
        )?;
        let id = tx.query_row(
            "SELECT regulation_id FROM regulation WHERE tenant_id = ?1 AND name = ?2",
            params![tenant_id, name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn ensure_lookup_tx(tx: &Transaction, regulation_id: i64, name: &str) -> RepositoryResult<i64> {
        let now = Utc::now().to_rfc3339();
        tx.execute(
            r#"
            INSERT INTO lookup (regulation_id, name, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(regulation_id, name) DO UPDATE SET updated_at = excluded.updated_at
            "#,
            params![regulation_id, name, now],
        )?;
        let id = tx.query_row(
            "SELECT lookup_id FROM lookup WHERE regulation_id = ?1 AND name = ?2",
            params![regulation_id, name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn write_lookup_values_tx(
        tx: &Transaction,
        lookup_id: i64,
        lookup: &LookupSet,
    ) -> RepositoryResult<usize> {
        // Update: 整体替换
        if lookup.update_mode == UpdateMode::Update {
            let removed = tx.execute(
                "DELETE FROM lookup_value WHERE lookup_id = ?1",
                params![lookup_id],
            )?;
            debug!(lookup = %lookup.name, removed, "清空查找表旧条目");
        }

        let mut next_seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq_no), 0) FROM lookup_value WHERE lookup_id = ?1",
            params![lookup_id],
            |row| row.get(0),
        )?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO lookup_value (
                lookup_id, value_identity, seq_no, key, key_values,
                range_value, value, value_object
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(lookup_id, value_identity) DO UPDATE SET
                key = excluded.key,
                key_values = excluded.key_values,
                range_value = excluded.range_value,
                value = excluded.value,
                value_object = excluded.value_object
            "#,
        )?;

        let mut count = 0;
        for value in &lookup.values {
            next_seq += 1;
            let key_values = value
                .key_values
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let value_object = value
                .value_object
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            stmt.execute(params![
                lookup_id,
                value.identity(),
                next_seq,
                value.key,
                key_values,
                value.range_value.map(|r| r.to_string()),
                value.value,
                value_object,
            ])?;
            count += 1;
        }

        tx.execute(
            r#"
            INSERT INTO lookup_import_batch (
                batch_id, lookup_id, update_mode, value_count, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                Uuid::new_v4().to_string(),
                lookup_id,
                lookup.update_mode.to_string(),
                count as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(count)
    }

    fn find_lookup_id(
        conn: &Connection,
        tenant: &str,
        regulation: &str,
        lookup: &str,
    ) -> RepositoryResult<Option<i64>> {
        let id = conn
            .query_row(
                r#"
                SELECT l.lookup_id
                FROM lookup l
                JOIN regulation r ON r.regulation_id = l.regulation_id
                JOIN tenant t ON t.tenant_id = r.tenant_id
                WHERE t.identifier = ?1 AND r.name = ?2 AND l.name = ?3
                "#,
                params![tenant, regulation, lookup],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// 查询查找表条目（按写入顺序）
    pub fn list_lookup_values(
        &self,
        tenant: &str,
        regulation: &str,
        lookup: &str,
    ) -> RepositoryResult<Vec<LookupValue>> {
        let conn = self.lock()?;
        let Some(lookup_id) = Self::find_lookup_id(&conn, tenant, regulation, lookup)? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT key, key_values, range_value, value, value_object
            FROM lookup_value
            WHERE lookup_id = ?1
            ORDER BY seq_no
            "#,
        )?;

        let rows = stmt.query_map(params![lookup_id], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut values = Vec::new();
        for row in rows {
            let (key, key_values, range_value, value, value_object) = row?;
            let range_value = range_value
                .map(|r| {
                    Decimal::from_str(&r).map_err(|e| RepositoryError::FieldValueError {
                        field: "range_value".to_string(),
                        message: e.to_string(),
                    })
                })
                .transpose()?;

            values.push(LookupValue {
                key,
                key_values: key_values
                    .map(|k| serde_json::from_str(&k))
                    .transpose()?,
                range_value,
                value,
                value_object: value_object
                    .map(|v| serde_json::from_str(&v))
                    .transpose()?,
            });
        }
        Ok(values)
    }

    /// 查找表条目数
    pub fn count_lookup_values(
        &self,
        tenant: &str,
        regulation: &str,
        lookup: &str,
    ) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let Some(lookup_id) = Self::find_lookup_id(&conn, tenant, regulation, lookup)? else {
            return Ok(0);
        };
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM lookup_value WHERE lookup_id = ?1",
            params![lookup_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 查找表的导入批次（按导入顺序）
    pub fn list_import_batches(
        &self,
        tenant: &str,
        regulation: &str,
        lookup: &str,
    ) -> RepositoryResult<Vec<LookupImportBatch>> {
        let conn = self.lock()?;
        let Some(lookup_id) = Self::find_lookup_id(&conn, tenant, regulation, lookup)? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, update_mode, value_count, imported_at
            FROM lookup_import_batch
            WHERE lookup_id = ?1
            ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map(params![lookup_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut batches = Vec::new();
        for row in rows {
            let (batch_id, update_mode, value_count, imported_at) = row?;
            let update_mode = update_mode
                .parse::<UpdateMode>()
                .map_err(|message| RepositoryError::FieldValueError {
                    field: "update_mode".to_string(),
                    message,
                })?;
            let imported_at = DateTime::parse_from_rfc3339(&imported_at)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "imported_at".to_string(),
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);

            batches.push(LookupImportBatch {
                batch_id,
                lookup_name: lookup.to_string(),
                update_mode,
                value_count: value_count as usize,
                imported_at,
            });
        }
        Ok(batches)
    }
}

#[async_trait]
impl ExchangeImporter for LookupExchangeRepository {
    async fn import_exchange(
        &self,
        exchange: &Exchange,
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let count = self.import_exchange_blocking(exchange)?;
        info!(values = count, "交换文档已落库");
        Ok(count)
    }
}
