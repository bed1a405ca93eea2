// ==========================================
// 查找表文本导入 - 配置层
// ==========================================
// 职责: 切片大小 / 输出目录 / 导入目标 的读取
// 存储: config_kv 表，缺省回落内置默认值
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{DefaultImportConfig, ImportConfigReader};
