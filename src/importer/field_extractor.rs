// ==========================================
// 查找表文本导入 - 字段提取
// ==========================================
// 定长列: start 为字符偏移，按 length 截取并去除首尾空白
// 制表符: start 为列序号，取对应列并去除首尾空白
// 空行 / start 越界 → None（不是错误）
// ==========================================

use crate::domain::mapping::ValueMap;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::format_detector::TextFormat;

/// 按字段定义从一行中提取原始文本
///
/// # 返回
/// - Ok(Some(String)): 提取到的文本（已 trim）
/// - Ok(None): 空行、越界或列不存在
/// - Err(MissingFieldLength): 定长模式下 length 缺失或为 0
pub fn extract_field(
    line: &str,
    field: &ValueMap,
    format: TextFormat,
) -> ImportResult<Option<String>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    // 偏移按字符计，避免多字节字符被截断
    let line_length = line.chars().count();
    if field.start >= line_length {
        return Ok(None);
    }

    match format {
        TextFormat::FixedColumns => {
            let length = match field.length {
                Some(length) if length > 0 => length,
                _ => return Err(ImportError::MissingFieldLength { start: field.start }),
            };
            let take = length.min(line_length - field.start);
            let text: String = line.chars().skip(field.start).take(take).collect();
            Ok(Some(text.trim().to_string()))
        }
        TextFormat::TabDelimited => Ok(line
            .split('\t')
            .nth(field.start)
            .map(|token| token.trim().to_string())),
    }
}
