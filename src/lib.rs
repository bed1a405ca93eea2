// ==========================================
// 查找表文本导入 - 核心库
// ==========================================
// 定长列 / 制表符分隔文本 → 法规查找表 → 切片 → 交换文档
// 输出: 交换文件（JSON）与/或 后端导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 映射与查找表
pub mod domain;

// 导入层 - 转换引擎
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据仓储层 - 后端存储
pub mod repository;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    Exchange, ImportTarget, LookupMapping, LookupSet, LookupValue, UpdateMode, ValueMap,
    ValueType,
};

pub use importer::{
    ExchangeImporter, ImportConsole, ImportError, ImportResult, LookupTextImportRequest,
    LookupTextImportSummary, LookupTextImporter, StdConsole,
};

pub use config::{ConfigManager, DefaultImportConfig, ImportConfigReader};

pub use repository::LookupExchangeRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "查找表文本导入";
