// ==========================================
// 查找表文本导入 - 领域层
// ==========================================
// 职责: 映射定义、查找表条目、交换文档
// 红线: 纯数据结构，不含读写逻辑
// ==========================================

pub mod exchange;
pub mod lookup;
pub mod mapping;
pub mod types;

// 重导出核心类型
pub use exchange::{Exchange, ExchangeRegulation, ExchangeTenant};
pub use lookup::{LookupSet, LookupValue};
pub use mapping::{KeyMapping, LookupMapping, LookupMappingDefinition, ValueMap, ValueMapping};
pub use types::{ImportTarget, UpdateMode, ValueType};
