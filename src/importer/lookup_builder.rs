// ==========================================
// 查找表文本导入 - 查找表构建器
// ==========================================
// 职责: 逐行读取源文件 → 行映射 → 累积条目，统计并记录忽略行
// 约束: 以共享只读方式打开（源文件可能正被其他程序占用）
// 约束: 格式只依据首个非空行判定一次
// ==========================================

use crate::domain::lookup::{LookupSet, LookupValue};
use crate::domain::mapping::LookupMapping;
use crate::domain::types::UpdateMode;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::format_detector::TextFormat;
use crate::importer::row_mapper::map_row;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// 单个源文件的构建结果
#[derive(Debug, Clone)]
pub struct LookupBuild {
    pub lookup: LookupSet,
    pub format: Option<TextFormat>,
    pub converted_lines: usize,
    pub ignored_lines: usize,
}

impl LookupBuild {
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// 读取源文件并构建查找表（UpdateMode::Update）
#[instrument(skip_all, fields(file = %path.as_ref().display(), lookup = lookup_name))]
pub async fn build_lookup<P: AsRef<Path>>(
    path: P,
    mapping: &LookupMapping,
    lookup_name: &str,
) -> ImportResult<LookupBuild> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    // std 在 Windows 上默认以 FILE_SHARE_READ | FILE_SHARE_WRITE 打开，允许他人同时占用
    let file = tokio::fs::File::open(path).await?;
    let mut reader = BufReader::new(file);

    let mut values: Vec<LookupValue> = Vec::new();
    let mut format: Option<TextFormat> = None;
    let mut ignored_lines = 0usize;
    let mut line_number = 0usize;
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        line_number += 1;

        // 非 UTF-8 源文件按有损方式解码
        let decoded = String::from_utf8_lossy(&buffer);
        let line = decoded.trim_end_matches(['\r', '\n']);

        let line_format = match format {
            Some(f) => f,
            None if line.trim().is_empty() => TextFormat::FixedColumns,
            None => {
                let detected = TextFormat::detect(line);
                debug!(format = %detected, line_number, "识别源文件格式");
                format = Some(detected);
                detected
            }
        };

        match map_row(line, mapping, line_format)? {
            Some(value) => values.push(value),
            None => {
                ignored_lines += 1;
                warn!(line_number, line = %line, "忽略无效行");
            }
        }
    }

    let converted_lines = values.len();
    info!(
        converted = converted_lines,
        ignored = ignored_lines,
        "转换 {} 行，忽略 {} 行",
        converted_lines,
        ignored_lines
    );

    Ok(LookupBuild {
        lookup: LookupSet::new(lookup_name, UpdateMode::Update, values),
        format,
        converted_lines,
        ignored_lines,
    })
}
