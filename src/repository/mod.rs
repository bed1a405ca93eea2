// ==========================================
// 查找表文本导入 - 数据仓储层
// ==========================================
// 职责: 后端导入协作方的 SQLite 实现
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod lookup_exchange_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use lookup_exchange_repo::{LookupExchangeRepository, LookupImportBatch};
