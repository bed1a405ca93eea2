// ==========================================
// 查找表文本导入 - 导入层
// ==========================================
// 职责: 定长/制表符文本 → 查找表 → 切片 → 交换文档
// 流程: 格式识别 → 字段提取 → 类型转换 → 行映射 → 构建 → 切片 → 导出
// ==========================================

// 模块声明
pub mod error;
pub mod exchange_exporter;
pub mod field_extractor;
pub mod format_detector;
pub mod lookup_builder;
pub mod lookup_importer_trait;
pub mod lookup_text_importer;
pub mod mapping_loader;
pub mod row_mapper;
pub mod slicer;
pub mod type_converter;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use exchange_exporter::{exchange_file_name, ExchangeExporter, SliceExport};
pub use field_extractor::extract_field;
pub use format_detector::TextFormat;
pub use lookup_builder::{build_lookup, LookupBuild};
pub use lookup_text_importer::{
    ImportOptions, LookupImportReport, LookupTextImportRequest, LookupTextImportSummary,
    LookupTextImporter,
};
pub use mapping_loader::{load_mapping, parse_mapping};
pub use row_mapper::map_row;
pub use slicer::{slice_lookup_values, LookupSlice, LookupSlicer};
pub use type_converter::{convert_decimal, convert_value, FieldValue};

// 重导出 Trait 接口
pub use lookup_importer_trait::{ExchangeImporter, ImportConsole, StdConsole};
