// ==========================================
// 查找表文本导入 - 行映射
// ==========================================
// 流程: 键 → (无键则丢弃) → 区间值 → 值 → (无值则丢弃) → 组装条目
// 红线: 键与值必须同时解析成功，这是区分数据行与表头/空行/坏行的唯一依据
// ==========================================

use crate::domain::lookup::LookupValue;
use crate::domain::mapping::{KeyMapping, LookupMapping, ValueMap, ValueMapping};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_extractor::extract_field;
use crate::importer::format_detector::TextFormat;
use crate::importer::type_converter::{convert_decimal, convert_value, FieldValue};
use serde_json::Map;

/// 将一行映射为查找表条目
///
/// # 返回
/// - Ok(Some(LookupValue)): 有效数据行
/// - Ok(None): 缺键或缺值，调用方计为忽略行
/// - Err: 映射配置错误（致命）
pub fn map_row(
    line: &str,
    mapping: &LookupMapping,
    format: TextFormat,
) -> ImportResult<Option<LookupValue>> {
    // === 键 ===
    let (key, key_values) = match &mapping.key {
        KeyMapping::Scalar(field) => (read_field(line, field, format)?, Vec::new()),
        KeyMapping::Composite(fields) => {
            let mut parts = Vec::with_capacity(fields.len());
            for field in fields {
                if let Some(part) = read_field(line, field, format)? {
                    parts.push(part.to_string());
                }
            }
            (None, parts)
        }
    };
    if key.is_none() && key_values.is_empty() {
        return Ok(None);
    }

    // === 区间值 ===
    let range_value = match &mapping.range_value {
        Some(field) => {
            let raw = extract_field(line, field, format)?;
            convert_decimal(raw.as_deref(), field)?
        }
        None => None,
    };

    // === 值 ===
    let (value, value_object) = match &mapping.value {
        ValueMapping::Scalar(field) => (read_field(line, field, format)?, Map::new()),
        ValueMapping::Object(fields) => {
            let mut object = Map::new();
            for (index, field) in fields.iter().enumerate() {
                let name = match field.name.as_deref().map(str::trim) {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => return Err(ImportError::MissingValueName { index }),
                };
                if let Some(item) = read_field(line, field, format)? {
                    object.insert(name, item.to_json());
                }
            }
            (None, object)
        }
    };
    if value.is_none() && value_object.is_empty() {
        return Ok(None);
    }

    Ok(Some(LookupValue {
        key: key.map(|k| k.to_string()),
        key_values: (!key_values.is_empty()).then_some(key_values),
        range_value,
        value: value.map(|v| v.to_string()),
        value_object: (!value_object.is_empty()).then_some(value_object),
    }))
}

fn read_field(
    line: &str,
    field: &ValueMap,
    format: TextFormat,
) -> ImportResult<Option<FieldValue>> {
    let raw = extract_field(line, field, format)?;
    Ok(convert_value(raw.as_deref(), field))
}
