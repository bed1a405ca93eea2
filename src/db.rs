// ==========================================
// 查找表文本导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表（配置表 + 后端查找表存储）幂等执行
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接，应用统一配置并确保 schema 存在
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS tenant (
            tenant_id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS regulation (
            regulation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id INTEGER NOT NULL REFERENCES tenant(tenant_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (tenant_id, name)
        );

        CREATE TABLE IF NOT EXISTS lookup (
            lookup_id INTEGER PRIMARY KEY AUTOINCREMENT,
            regulation_id INTEGER NOT NULL REFERENCES regulation(regulation_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (regulation_id, name)
        );

        CREATE TABLE IF NOT EXISTS lookup_value (
            lookup_id INTEGER NOT NULL REFERENCES lookup(lookup_id) ON DELETE CASCADE,
            value_identity TEXT NOT NULL,
            seq_no INTEGER NOT NULL,
            key TEXT,
            key_values TEXT,
            range_value TEXT,
            value TEXT,
            value_object TEXT,
            PRIMARY KEY (lookup_id, value_identity)
        );

        CREATE TABLE IF NOT EXISTS lookup_import_batch (
            batch_id TEXT PRIMARY KEY,
            lookup_id INTEGER NOT NULL REFERENCES lookup(lookup_id) ON DELETE CASCADE,
            update_mode TEXT NOT NULL,
            value_count INTEGER NOT NULL,
            imported_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
