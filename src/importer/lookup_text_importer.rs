// ==========================================
// 查找表文本导入 - 导入器实现
// ==========================================
// 流程: 解析运行参数 → 加载映射 → 解析文件掩码
//       → 逐文件: 构建查找表 → 切片 → 导出（文件 / 后端）
// 约束: 严格串行，一个文件的全部导出完成后才处理下一个
// 约束: 任一错误中止整个运行，已写出的切片文件不回滚
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::mapping::LookupMapping;
use crate::domain::types::ImportTarget;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::exchange_exporter::{ExchangeExporter, SliceExport};
use crate::importer::lookup_builder::build_lookup;
use crate::importer::lookup_importer_trait::{ExchangeImporter, ImportConsole};
use crate::importer::mapping_loader::load_mapping;
use crate::importer::slicer::LookupSlicer;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

// ==========================================
// 导入请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupTextImportRequest {
    /// 源文件路径或掩码（如 data/*.txt）
    pub source_file_mask: String,
    /// 映射定义 JSON
    pub mapping_file: PathBuf,
    /// 租户标识
    pub tenant: String,
    /// 法规名称
    pub regulation: String,
    /// 以下为可选覆写，缺省取配置
    #[serde(default)]
    pub slice_size: Option<usize>,
    #[serde(default)]
    pub target_folder: Option<PathBuf>,
    #[serde(default)]
    pub import_target: Option<ImportTarget>,
}

/// 生效的运行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub slice_size: usize,
    pub target_folder: PathBuf,
    pub import_target: ImportTarget,
}

// ==========================================
// 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct LookupImportReport {
    pub source_file: PathBuf,
    pub lookup_name: String,
    pub converted_lines: usize,
    pub ignored_lines: usize,
    /// 实际导出的切片数（空文件为 0）
    pub slice_count: usize,
    pub value_count: usize,
    pub written_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTextImportSummary {
    pub reports: Vec<LookupImportReport>,
}

impl LookupTextImportSummary {
    /// 已转换的导出单元总数
    pub fn total_slices(&self) -> usize {
        self.reports.iter().map(|r| r.slice_count).sum()
    }

    pub fn total_values(&self) -> usize {
        self.reports.iter().map(|r| r.value_count).sum()
    }
}

// ==========================================
// LookupTextImporter
// ==========================================
pub struct LookupTextImporter<C>
where
    C: ImportConfigReader,
{
    // 配置读取器
    config: C,

    // 控制台输出
    console: Arc<dyn ImportConsole>,

    // 后端导入（可选）
    backend: Option<Arc<dyn ExchangeImporter>>,
}

impl<C> LookupTextImporter<C>
where
    C: ImportConfigReader,
{
    pub fn new(config: C, console: Arc<dyn ImportConsole>) -> Self {
        Self {
            config,
            console,
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ExchangeImporter>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// 合并请求覆写与配置
    pub async fn resolve_options(
        &self,
        request: &LookupTextImportRequest,
    ) -> ImportResult<ImportOptions> {
        let slice_size = match request.slice_size {
            Some(size) => size,
            None => self.config.get_slice_size().await?,
        };
        let target_folder = match &request.target_folder {
            Some(folder) => folder.clone(),
            None => self.config.get_target_folder().await?,
        };
        let import_target = match request.import_target {
            Some(target) => target,
            None => self.config.get_import_target().await?,
        };

        Ok(ImportOptions {
            slice_size,
            target_folder,
            import_target,
        })
    }

    /// 执行导入
    #[instrument(skip_all, fields(mask = %request.source_file_mask, tenant = %request.tenant))]
    pub async fn import(
        &self,
        request: &LookupTextImportRequest,
    ) -> ImportResult<LookupTextImportSummary> {
        let options = self.resolve_options(request).await?;
        info!(
            slice_size = options.slice_size,
            target_folder = %options.target_folder.display(),
            import_target = %options.import_target,
            "开始查找表文本导入"
        );

        let exporter = ExchangeExporter::new(
            &request.tenant,
            &request.regulation,
            options.import_target,
            &options.target_folder,
            self.backend.as_deref(),
        )?;

        let mapping = load_mapping(&request.mapping_file).await?;
        let source_files = resolve_source_files(&request.source_file_mask)?;
        debug!(files = source_files.len(), "源文件解析完成");

        let mut summary = LookupTextImportSummary::default();
        for source_file in source_files {
            let lookup_name = lookup_name_of(&source_file);
            match self
                .import_file(&source_file, &lookup_name, &mapping, &exporter, &options)
                .await
            {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!(file = %source_file.display(), error = %e, "查找表导入失败");
                    self.console
                        .write_error_line(&format!("查找表 {} 导入失败: {}", lookup_name, e));
                    return Err(e);
                }
            }
        }

        info!(
            files = summary.reports.len(),
            slices = summary.total_slices(),
            "查找表文本导入完成"
        );
        Ok(summary)
    }

    async fn import_file(
        &self,
        source_file: &Path,
        lookup_name: &str,
        mapping: &LookupMapping,
        exporter: &ExchangeExporter<'_>,
        options: &ImportOptions,
    ) -> ImportResult<LookupImportReport> {
        let build = build_lookup(source_file, mapping, lookup_name).await?;
        self.console.write_line(&format!(
            "{}: 转换 {} 行，忽略 {} 行",
            source_file.display(),
            build.converted_lines,
            build.ignored_lines
        ));

        let mut report = LookupImportReport {
            source_file: source_file.to_path_buf(),
            lookup_name: lookup_name.to_string(),
            converted_lines: build.converted_lines,
            ignored_lines: build.ignored_lines,
            slice_count: 0,
            value_count: 0,
            written_files: Vec::new(),
        };

        // 无有效条目: 不导出，不算错误
        if build.is_empty() {
            self.console
                .write_line(&format!("查找表 {} 无有效数据，已跳过", lookup_name));
            return Ok(report);
        }

        for slice in LookupSlicer::new(&build.lookup.values, options.slice_size) {
            let SliceExport {
                value_count, file, ..
            } = exporter.export(lookup_name, slice).await?;
            report.slice_count += 1;
            report.value_count += value_count;
            report.written_files.extend(file);
        }

        self.console.write_success_line(&format!(
            "查找表 {} 已导入 {}（{} 条）",
            lookup_name,
            describe_destination(options),
            report.value_count
        ));
        Ok(report)
    }
}

/// 解析源文件路径或掩码，按枚举顺序返回
pub fn resolve_source_files(mask: &str) -> ImportResult<Vec<PathBuf>> {
    let direct = Path::new(mask);
    if direct.is_file() {
        return Ok(vec![direct.to_path_buf()]);
    }

    let entries = glob::glob(mask).map_err(|e| ImportError::InvalidFileMask {
        mask: mask.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("读取文件掩码匹配项失败: {}", mask))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(ImportError::NoSourceFiles {
            mask: mask.to_string(),
        });
    }
    Ok(files)
}

/// 查找表名称取源文件名（不含扩展名）
pub fn lookup_name_of(source_file: &Path) -> String {
    source_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_file.display().to_string())
}

fn describe_destination(options: &ImportOptions) -> String {
    let folder = options.target_folder.display();
    match options.import_target {
        ImportTarget::File => format!("{}", folder),
        ImportTarget::Backend => "后端".to_string(),
        ImportTarget::Both => format!("{} 与后端", folder),
        ImportTarget::None => "无输出目标".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultImportConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_name_of() {
        assert_eq!(lookup_name_of(Path::new("/data/TaxRates.txt")), "TaxRates");
        assert_eq!(lookup_name_of(Path::new("Codes")), "Codes");
    }

    #[test]
    fn test_resolve_direct_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let files = resolve_source_files(file.to_str().unwrap()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_resolve_mask_skips_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("b.txt"), "x").unwrap();
        fs::write(dir.path().join("c.csv"), "x").unwrap();
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let mask = format!("{}/*.txt", dir.path().display());
        let files = resolve_source_files(&mask).unwrap();
        let names: Vec<String> = files.iter().map(|f| lookup_name_of(f)).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_resolve_mask_without_match() {
        let dir = tempdir().unwrap();
        let mask = format!("{}/*.txt", dir.path().display());
        let err = resolve_source_files(&mask).unwrap_err();
        assert!(matches!(err, ImportError::NoSourceFiles { .. }));
    }

    #[test]
    fn test_resolve_invalid_mask() {
        let err = resolve_source_files("data/[*.txt").unwrap_err();
        assert!(matches!(err, ImportError::InvalidFileMask { .. }));
    }

    #[tokio::test]
    async fn test_request_overrides_config() {
        let config = DefaultImportConfig {
            slice_size: 10,
            target_folder: PathBuf::from("cfg"),
            import_target: ImportTarget::Backend,
        };
        let importer = LookupTextImporter::new(config, Arc::new(crate::importer::StdConsole));

        let mut request = LookupTextImportRequest {
            source_file_mask: "*.txt".to_string(),
            mapping_file: PathBuf::from("mapping.json"),
            tenant: "Acme".to_string(),
            regulation: "Payroll".to_string(),
            slice_size: None,
            target_folder: None,
            import_target: None,
        };

        let options = importer.resolve_options(&request).await.unwrap();
        assert_eq!(options.slice_size, 10);
        assert_eq!(options.target_folder, PathBuf::from("cfg"));
        assert_eq!(options.import_target, ImportTarget::Backend);

        request.slice_size = Some(0);
        request.target_folder = Some(PathBuf::from("out"));
        request.import_target = Some(ImportTarget::File);
        let options = importer.resolve_options(&request).await.unwrap();
        assert_eq!(options.slice_size, 0);
        assert_eq!(options.target_folder, PathBuf::from("out"));
        assert_eq!(options.import_target, ImportTarget::File);
    }

    #[test]
    fn test_request_deserialization() {
        let request: LookupTextImportRequest = serde_json::from_str(
            r#"{"sourceFileMask":"data/*.txt","mappingFile":"map.json",
                "tenant":"Acme","regulation":"Payroll","sliceSize":500,"importTarget":"BOTH"}"#,
        )
        .unwrap();
        assert_eq!(request.slice_size, Some(500));
        assert_eq!(request.import_target, Some(ImportTarget::Both));
        assert_eq!(request.target_folder, None);
    }
}
