// ==========================================
// 查找表文本导入 - 映射定义
// ==========================================
// 职责: 映射 JSON 的纯数据结构（无行为）
// 约束: 加载一次，之后只读
// ==========================================

use crate::domain::types::ValueType;
use serde::{Deserialize, Serialize};

// ==========================================
// ValueMap - 单个字段的位置与类型
// ==========================================
// start: 定长模式下为字符偏移，制表符模式下为列序号（均从 0 开始）
// length: 定长模式必填且非零
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueMap {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "ValueType")]
    pub value_type: ValueType,
    #[serde(alias = "Start")]
    pub start: usize,
    #[serde(alias = "Length", skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(alias = "DecimalPlaces")]
    pub decimal_places: u32,
}

impl ValueMap {
    pub fn text(start: usize, length: Option<usize>) -> Self {
        Self {
            start,
            length,
            ..Self::default()
        }
    }

    pub fn typed(value_type: ValueType, start: usize, length: Option<usize>) -> Self {
        Self {
            value_type,
            start,
            length,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }
}

// ==========================================
// LookupMappingDefinition - 映射文件原样结构
// ==========================================
// key/keys 与 value/values 各自二选一，由加载器校验
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupMappingDefinition {
    #[serde(alias = "Key")]
    pub key: Option<ValueMap>,
    #[serde(alias = "Keys")]
    pub keys: Option<Vec<ValueMap>>,
    #[serde(alias = "RangeValue")]
    pub range_value: Option<ValueMap>,
    #[serde(alias = "Value")]
    pub value: Option<ValueMap>,
    #[serde(alias = "Values")]
    pub values: Option<Vec<ValueMap>>,
}

// ==========================================
// 键映射: 单字段 / 组合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMapping {
    Scalar(ValueMap),
    Composite(Vec<ValueMap>),
}

// ==========================================
// 值映射: 单字段 / 命名字段对象
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueMapping {
    Scalar(ValueMap),
    Object(Vec<ValueMap>),
}

/// 校验后的查找表映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMapping {
    pub key: KeyMapping,
    pub range_value: Option<ValueMap>,
    pub value: ValueMapping,
}

impl LookupMapping {
    /// 全部字段定义: 键 → 区间值 → 值
    pub fn fields(&self) -> impl Iterator<Item = &ValueMap> {
        let keys = match &self.key {
            KeyMapping::Scalar(field) => std::slice::from_ref(field),
            KeyMapping::Composite(fields) => fields.as_slice(),
        };
        let values = match &self.value {
            ValueMapping::Scalar(field) => std::slice::from_ref(field),
            ValueMapping::Object(fields) => fields.as_slice(),
        };
        keys.iter().chain(self.range_value.iter()).chain(values.iter())
    }
}
