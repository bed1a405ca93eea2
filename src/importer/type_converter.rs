// ==========================================
// 查找表文本导入 - 类型转换
// ==========================================
// 空/空白文本 → None
// Text: 原样返回
// Integer / Boolean / Decimal: 区域无关解析，失败 → None（不报错）
// Decimal: decimalPlaces > 0 时按 10^decimalPlaces 缩放（定点文本）
// ==========================================

use crate::domain::mapping::ValueMap;
use crate::domain::types::ValueType;
use crate::importer::error::{ImportError, ImportResult};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ==========================================
// FieldValue - 转换后的字段值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
    Decimal(Decimal),
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Text(_) => ValueType::Text,
            FieldValue::Integer(_) => ValueType::Integer,
            FieldValue::Boolean(_) => ValueType::Boolean,
            FieldValue::Decimal(_) => ValueType::Decimal,
        }
    }

    /// 值对象中的 JSON 表示
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Boolean(b) => Value::Bool(*b),
            // 小数以文本保留全部位数与标度
            FieldValue::Decimal(d) => Value::String(d.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// 按字段定义转换原始文本
pub fn convert_value(raw: Option<&str>, field: &ValueMap) -> Option<FieldValue> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }

    match field.value_type {
        ValueType::Text => Some(FieldValue::Text(raw.to_string())),
        ValueType::Integer => raw.trim().parse::<i32>().ok().map(FieldValue::Integer),
        ValueType::Boolean => parse_boolean(raw).map(FieldValue::Boolean),
        ValueType::Decimal => parse_decimal(raw)
            .and_then(|d| scale_decimal(d, field.decimal_places))
            .map(FieldValue::Decimal),
    }
}

/// 区间值专用转换：结果必须可作为小数使用
pub fn convert_decimal(raw: Option<&str>, field: &ValueMap) -> ImportResult<Option<Decimal>> {
    match convert_value(raw, field) {
        None => Ok(None),
        Some(value) => value
            .as_decimal()
            .map(Some)
            .ok_or_else(|| ImportError::RangeValueNotDecimal {
                value_type: value.value_type().to_string(),
            }),
    }
}

fn parse_boolean(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    // 允许千分位分隔符
    let normalized: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&normalized).ok()
}

/// 定点缩放: 12345 @2 → 123.45（保留位数，1.50 不会变成 1.5）
fn scale_decimal(value: Decimal, decimal_places: u32) -> Option<Decimal> {
    if decimal_places == 0 {
        return Some(value);
    }
    let mut scaled = value;
    scaled.set_scale(value.scale().checked_add(decimal_places)?).ok()?;
    Some(scaled)
}
