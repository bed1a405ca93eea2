// ==========================================
// 查找表文本导入 - 格式识别
// ==========================================
// 规则: 首个数据行含制表符 → 制表符分隔，否则 → 定长列
// 约束: 每个文件只判定一次，后续行沿用同一格式
// ==========================================

use std::fmt;

/// 源文件文本格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    FixedColumns,
    TabDelimited,
}

impl TextFormat {
    /// 依据首个数据行判定格式
    pub fn detect(first_data_line: &str) -> Self {
        if first_data_line.contains('\t') {
            TextFormat::TabDelimited
        } else {
            TextFormat::FixedColumns
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::FixedColumns => write!(f, "FIXED_COLUMNS"),
            TextFormat::TabDelimited => write!(f, "TAB_DELIMITED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_tab_delimited() {
        assert_eq!(TextFormat::detect("A1\t2\t300"), TextFormat::TabDelimited);
        assert_eq!(TextFormat::detect("\t"), TextFormat::TabDelimited);
    }

    #[test]
    fn test_detect_fixed_columns() {
        assert_eq!(TextFormat::detect("A1234   00150"), TextFormat::FixedColumns);
        assert_eq!(TextFormat::detect(""), TextFormat::FixedColumns);
    }

    #[test]
    fn test_detect_is_stable() {
        let line = "K01 0012";
        assert_eq!(TextFormat::detect(line), TextFormat::detect(line));
    }
}
