// ==========================================
// 查找表文本导入 - 领域类型定义
// ==========================================
// 值类型 / 更新模式 / 导入目标
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 值类型 (Value Type)
// ==========================================
// 映射定义中 valueType 的取值，缺省为 Text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    #[serde(alias = "Text")]
    Text,
    #[serde(alias = "Decimal")]
    Decimal,
    #[serde(alias = "Integer")]
    Integer,
    #[serde(alias = "Boolean")]
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Decimal => write!(f, "decimal"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Boolean => write!(f, "boolean"),
        }
    }
}

// ==========================================
// 更新模式 (Update Mode)
// ==========================================
// Update: 整体替换；NoUpdate: 增量合并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateMode {
    Update,
    NoUpdate,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Update => write!(f, "Update"),
            UpdateMode::NoUpdate => write!(f, "NoUpdate"),
        }
    }
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Update" => Ok(UpdateMode::Update),
            "NoUpdate" => Ok(UpdateMode::NoUpdate),
            other => Err(format!("未知的更新模式: {}", other)),
        }
    }
}

// ==========================================
// 导入目标 (Import Target)
// ==========================================
// File: 写交换文件；Backend: 交给后端导入；Both: 两者皆做
// None: 只转换与汇报，不产生任何输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportTarget {
    #[default]
    File,
    Backend,
    Both,
    None,
}

impl ImportTarget {
    pub fn writes_file(self) -> bool {
        matches!(self, ImportTarget::File | ImportTarget::Both)
    }

    pub fn uses_backend(self) -> bool {
        matches!(self, ImportTarget::Backend | ImportTarget::Both)
    }
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportTarget::File => write!(f, "FILE"),
            ImportTarget::Backend => write!(f, "BACKEND"),
            ImportTarget::Both => write!(f, "BOTH"),
            ImportTarget::None => write!(f, "NONE"),
        }
    }
}

impl FromStr for ImportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FILE" => Ok(ImportTarget::File),
            "BACKEND" => Ok(ImportTarget::Backend),
            "BOTH" => Ok(ImportTarget::Both),
            "NONE" => Ok(ImportTarget::None),
            other => Err(format!("未知的导入目标: {}", other)),
        }
    }
}
