// ==========================================
// 查找表文本导入 - 配置管理器
// ==========================================
// 职责: 导入配置读取与覆写
// 存储: config_kv 表 (key-value + scope)，缺省时回落内置默认值
// ==========================================

use crate::config::import_config_trait::{DefaultImportConfig, ImportConfigReader};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::ImportTarget;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const SLICE_SIZE: &str = "lookup_import.slice_size";
    pub const TARGET_FOLDER: &str = "lookup_import.target_folder";
    pub const IMPORT_TARGET: &str = "lookup_import.import_target";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    defaults: DefaultImportConfig,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ImportError::ConfigReadError {
            key: db_path.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults: DefaultImportConfig::default(),
        })
    }

    /// 从已有连接创建 ConfigManager（与后端存储共用同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;
            configure_sqlite_connection(&guard)
                .and_then(|_| ensure_schema(&guard))
                .map_err(|e| ImportError::ConfigReadError {
                    key: "schema".to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            conn,
            defaults: DefaultImportConfig::default(),
        })
    }

    /// 替换缺省值
    pub fn with_defaults(mut self, defaults: DefaultImportConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let read_error = |message: String| ImportError::ConfigReadError {
            key: key.to_string(),
            message,
        };
        let conn = self
            .conn
            .lock()
            .map_err(|e| read_error(format!("锁获取失败: {}", e)))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| read_error(e.to_string()))
    }

    /// 写入 global scope 的配置值（覆盖已有值）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let write_error = |message: String| ImportError::ConfigReadError {
            key: key.to_string(),
            message,
        };
        let conn = self
            .conn
            .lock()
            .map_err(|e| write_error(format!("锁获取失败: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )
        .map_err(|e| write_error(e.to_string()))?;

        tracing::debug!(config_key = key, value, "配置已更新");
        Ok(())
    }

    fn value_error(key: &str, value: &str, message: String) -> ImportError {
        ImportError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message,
        }
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_slice_size(&self) -> ImportResult<usize> {
        match self.get_config_value(config_keys::SLICE_SIZE)? {
            None => Ok(self.defaults.slice_size),
            Some(value) => value.trim().parse::<usize>().map_err(|e| {
                Self::value_error(config_keys::SLICE_SIZE, &value, e.to_string())
            }),
        }
    }

    async fn get_target_folder(&self) -> ImportResult<PathBuf> {
        match self.get_config_value(config_keys::TARGET_FOLDER)? {
            Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value.trim())),
            _ => Ok(self.defaults.target_folder.clone()),
        }
    }

    async fn get_import_target(&self) -> ImportResult<ImportTarget> {
        match self.get_config_value(config_keys::IMPORT_TARGET)? {
            None => Ok(self.defaults.import_target),
            // 显式置空: 不选任何目标
            Some(value) if value.trim().is_empty() => Ok(ImportTarget::None),
            Some(value) => value
                .parse::<ImportTarget>()
                .map_err(|message| Self::value_error(config_keys::IMPORT_TARGET, &value, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let manager = in_memory_manager();
        assert_eq!(manager.get_slice_size().await.unwrap(), 0);
        assert_eq!(manager.get_target_folder().await.unwrap(), PathBuf::from("."));
        assert_eq!(manager.get_import_target().await.unwrap(), ImportTarget::File);
    }

    #[tokio::test]
    async fn test_values_from_config_kv() {
        let manager = in_memory_manager();
        manager.set_config_value(config_keys::SLICE_SIZE, "500").unwrap();
        manager.set_config_value(config_keys::TARGET_FOLDER, "/tmp/lookups").unwrap();
        manager.set_config_value(config_keys::IMPORT_TARGET, "both").unwrap();

        assert_eq!(manager.get_slice_size().await.unwrap(), 500);
        assert_eq!(
            manager.get_target_folder().await.unwrap(),
            PathBuf::from("/tmp/lookups")
        );
        assert_eq!(manager.get_import_target().await.unwrap(), ImportTarget::Both);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let manager = in_memory_manager();
        manager.set_config_value(config_keys::SLICE_SIZE, "10").unwrap();
        manager.set_config_value(config_keys::SLICE_SIZE, "20").unwrap();
        assert_eq!(manager.get_slice_size().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_malformed_values_rejected() {
        let manager = in_memory_manager();
        manager.set_config_value(config_keys::SLICE_SIZE, "-1").unwrap();
        manager.set_config_value(config_keys::IMPORT_TARGET, "ftp").unwrap();

        let err = manager.get_slice_size().await.unwrap_err();
        assert!(matches!(err, ImportError::ConfigValueError { .. }));
        let err = manager.get_import_target().await.unwrap_err();
        assert!(matches!(err, ImportError::ConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_empty_import_target_selects_none() {
        let manager = in_memory_manager();
        manager.set_config_value(config_keys::IMPORT_TARGET, " ").unwrap();
        assert_eq!(manager.get_import_target().await.unwrap(), ImportTarget::None);

        manager.set_config_value(config_keys::IMPORT_TARGET, "NONE").unwrap();
        assert_eq!(manager.get_import_target().await.unwrap(), ImportTarget::None);
    }

    #[tokio::test]
    async fn test_custom_defaults() {
        let manager = in_memory_manager().with_defaults(DefaultImportConfig {
            slice_size: 1000,
            target_folder: PathBuf::from("out"),
            import_target: ImportTarget::Backend,
        });
        assert_eq!(manager.get_slice_size().await.unwrap(), 1000);
        assert_eq!(manager.get_import_target().await.unwrap(), ImportTarget::Backend);
    }
}
