// ==========================================
// 查找表文本导入 - 查找表实体
// ==========================================
// LookupValue: 一行源数据转换出的条目
// LookupSet: 一个查找表（名称 + 更新模式 + 条目）
// ==========================================

use crate::domain::types::UpdateMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// LookupValue - 查找表条目
// ==========================================
// 红线: 必须同时具备键（key 或 keyValues）与值（value 或 valueObject）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_values: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub range_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_object: Option<Map<String, Value>>,
}

impl LookupValue {
    /// 用于合并导入的条目标识（键 + 组合键 + 区间值）
    pub fn identity(&self) -> String {
        let key_values = self
            .key_values
            .as_ref()
            .map(|parts| parts.join("\u{1f}"))
            .unwrap_or_default();
        let range = self
            .range_value
            .map(|r| r.normalize().to_string())
            .unwrap_or_default();
        format!(
            "{}\u{1e}{}\u{1e}{}",
            self.key.as_deref().unwrap_or_default(),
            key_values,
            range
        )
    }
}

// ==========================================
// LookupSet - 查找表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupSet {
    pub name: String,
    pub update_mode: UpdateMode,
    pub values: Vec<LookupValue>,
}

impl LookupSet {
    pub fn new(name: impl Into<String>, update_mode: UpdateMode, values: Vec<LookupValue>) -> Self {
        Self {
            name: name.into(),
            update_mode,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
