// ==========================================
// 查找表文本导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 配置错误（致命）/ 文件错误（致命）/ 导出错误（原样上抛）
// 说明: 行级数据错误不进入此类型，由构建器计数并跳过
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件掩码未匹配到任何源文件: {mask}")]
    NoSourceFiles { mask: String },

    #[error("文件掩码无效 ({mask}): {message}")]
    InvalidFileMask { mask: String, message: String },

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 映射配置错误 =====
    #[error("映射文件解析失败: {0}")]
    MappingParseError(String),

    #[error("映射缺少键定义（key 或 keys）")]
    MappingMissingKey,

    #[error("映射缺少值定义（value 或 values）")]
    MappingMissingValue,

    #[error("映射同时定义了 key 与 keys")]
    AmbiguousKeyMapping,

    #[error("映射同时定义了 value 与 values")]
    AmbiguousValueMapping,

    #[error("values 第 {index} 项缺少 name")]
    MissingValueName { index: usize },

    #[error("定长字段缺少长度 (start={start})")]
    MissingFieldLength { start: usize },

    #[error("小数位数超出范围 (start={start}): {places}")]
    InvalidDecimalPlaces { start: usize, places: u32 },

    #[error("区间值必须为小数类型，实际: {value_type}")]
    RangeValueNotDecimal { value_type: String },

    // ===== 运行配置错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("导入目标包含后端，但未提供后端导入器")]
    BackendUnavailable,

    // ===== 导出错误 =====
    #[error("交换文件写入失败 ({path}): {message}")]
    ExportWriteError { path: String, message: String },

    #[error("后端导入失败 (查找表 {lookup}): {source}")]
    BackendImportError {
        lookup: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为映射/运行配置错误
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ImportError::MappingParseError(_)
                | ImportError::MappingMissingKey
                | ImportError::MappingMissingValue
                | ImportError::AmbiguousKeyMapping
                | ImportError::AmbiguousValueMapping
                | ImportError::MissingValueName { .. }
                | ImportError::MissingFieldLength { .. }
                | ImportError::InvalidDecimalPlaces { .. }
                | ImportError::RangeValueNotDecimal { .. }
                | ImportError::ConfigValueError { .. }
                | ImportError::BackendUnavailable
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MappingParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
