// ==========================================
// 查找表文本导入 - 映射加载器
// ==========================================
// 职责: 读取映射 JSON → 校验 → LookupMapping
// 红线: 缺少键定义或值定义即为致命配置错误
// ==========================================

use crate::domain::mapping::{KeyMapping, LookupMapping, LookupMappingDefinition, ValueMapping};
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;
use tracing::debug;

/// decimalPlaces 上限（Decimal 最大标度）
pub const MAX_DECIMAL_PLACES: u32 = 28;

/// 从文件加载映射
pub async fn load_mapping<P: AsRef<Path>>(path: P) -> ImportResult<LookupMapping> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    let mapping = parse_mapping(&json)?;
    debug!(mapping_file = %path.display(), "映射加载完成");
    Ok(mapping)
}

/// 从 JSON 文本解析映射
pub fn parse_mapping(json: &str) -> ImportResult<LookupMapping> {
    let definition: LookupMappingDefinition = serde_json::from_str(json)?;
    validate_mapping(definition)
}

/// 校验映射定义并折叠为键/值两侧的和类型
pub fn validate_mapping(definition: LookupMappingDefinition) -> ImportResult<LookupMapping> {
    // 空列表视同未定义
    let keys = definition.keys.filter(|k| !k.is_empty());
    let values = definition.values.filter(|v| !v.is_empty());

    let key = match (definition.key, keys) {
        (Some(_), Some(_)) => return Err(ImportError::AmbiguousKeyMapping),
        (Some(key), None) => KeyMapping::Scalar(key),
        (None, Some(keys)) => KeyMapping::Composite(keys),
        (None, None) => return Err(ImportError::MappingMissingKey),
    };

    let value = match (definition.value, values) {
        (Some(_), Some(_)) => return Err(ImportError::AmbiguousValueMapping),
        (Some(value), None) => ValueMapping::Scalar(value),
        (None, Some(values)) => ValueMapping::Object(values),
        (None, None) => return Err(ImportError::MappingMissingValue),
    };

    let mapping = LookupMapping {
        key,
        range_value: definition.range_value,
        value,
    };

    if let Some(field) = mapping.fields().find(|f| f.decimal_places > MAX_DECIMAL_PLACES) {
        return Err(ImportError::InvalidDecimalPlaces {
            start: field.start,
            places: field.decimal_places,
        });
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ValueType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_scalar_mapping() {
        let mapping = parse_mapping(
            r#"{"key":{"start":0,"length":5},
                "value":{"start":5,"length":10,"valueType":"decimal","decimalPlaces":2}}"#,
        )
        .unwrap();

        match &mapping.key {
            KeyMapping::Scalar(key) => assert_eq!(key.length, Some(5)),
            other => panic!("期望单字段键, 实际 {:?}", other),
        }
        match &mapping.value {
            ValueMapping::Scalar(value) => {
                assert_eq!(value.value_type, ValueType::Decimal);
                assert_eq!(value.decimal_places, 2);
            }
            other => panic!("期望单字段值, 实际 {:?}", other),
        }
        assert!(mapping.range_value.is_none());
    }

    #[test]
    fn test_parse_composite_mapping() {
        let mapping = parse_mapping(
            r#"{"keys":[{"start":0},{"start":1}],
                "values":[{"name":"rate","start":2,"valueType":"decimal"}]}"#,
        )
        .unwrap();

        assert!(matches!(&mapping.key, KeyMapping::Composite(keys) if keys.len() == 2));
        assert!(matches!(&mapping.value, ValueMapping::Object(values) if values.len() == 1));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = parse_mapping(r#"{"value":{"start":0}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MappingMissingKey));

        let err = parse_mapping(r#"{"keys":[],"value":{"start":0}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MappingMissingKey));
    }

    #[test]
    fn test_missing_value_is_fatal() {
        let err = parse_mapping(r#"{"key":{"start":0}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MappingMissingValue));
    }

    #[test]
    fn test_ambiguous_sides_rejected() {
        let err = parse_mapping(r#"{"key":{"start":0},"keys":[{"start":1}],"value":{"start":2}}"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::AmbiguousKeyMapping));

        let err = parse_mapping(
            r#"{"key":{"start":0},"value":{"start":1},"values":[{"name":"a","start":2}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::AmbiguousValueMapping));
    }

    #[test]
    fn test_decimal_places_out_of_range_rejected() {
        let err = parse_mapping(
            r#"{"key":{"start":0},
                "value":{"start":1,"valueType":"decimal","decimalPlaces":4294967295}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidDecimalPlaces { start: 1, places: u32::MAX }
        ));
        assert!(err.is_configuration_error());

        let err = parse_mapping(r#"{"keys":[{"start":0,"decimalPlaces":29}],"value":{"start":1}}"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidDecimalPlaces { places: 29, .. }));

        let mapping = parse_mapping(
            r#"{"key":{"start":0},
                "rangeValue":{"start":2,"valueType":"decimal","decimalPlaces":28},
                "value":{"start":1}}"#,
        )
        .unwrap();
        assert_eq!(mapping.fields().count(), 3);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_mapping("{not json").unwrap_err();
        assert!(matches!(err, ImportError::MappingParseError(_)));
    }

    #[tokio::test]
    async fn test_load_mapping_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"key":{{"start":0}},"value":{{"start":1}}}}"#).unwrap();

        let mapping = load_mapping(file.path()).await.unwrap();
        assert!(matches!(mapping.key, KeyMapping::Scalar(_)));
    }

    #[tokio::test]
    async fn test_load_mapping_missing_file() {
        let err = load_mapping("no_such_mapping.json").await.unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
