// ==========================================
// 查找表文本导入 - 交换文档导出
// ==========================================
// 每个切片 → 交换文档（单租户 / 单法规 / 单查找表）
// 文件目标: <lookup>.json 或 <lookup>_<NN|NNN>.json（缩进 JSON）
// 后端目标: 交给 ExchangeImporter
// ==========================================

use crate::domain::exchange::Exchange;
use crate::domain::types::{ImportTarget, UpdateMode};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::lookup_importer_trait::ExchangeImporter;
use crate::importer::slicer::LookupSlice;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 单个切片的导出结果
#[derive(Debug, Clone, PartialEq)]
pub struct SliceExport {
    pub index: Option<usize>,
    pub update_mode: UpdateMode,
    pub value_count: usize,
    pub file: Option<PathBuf>,
    pub backend_values: Option<usize>,
}

/// 交换文件名: 未切片不带序号，序号 < 100 两位，>= 100 三位
pub fn exchange_file_name(lookup_name: &str, slice_index: Option<usize>) -> String {
    match slice_index {
        None => format!("{}.json", lookup_name),
        Some(index) if index < 100 => format!("{}_{:02}.json", lookup_name, index),
        Some(index) => format!("{}_{:03}.json", lookup_name, index),
    }
}

/// 以缩进 JSON 写出交换文档
pub async fn write_exchange_file(
    target_folder: &Path,
    file_name: &str,
    exchange: &Exchange,
) -> ImportResult<PathBuf> {
    let path = target_folder.join(file_name);
    let write_error = |message: String| ImportError::ExportWriteError {
        path: path.display().to_string(),
        message,
    };

    let json = serde_json::to_string_pretty(exchange).map_err(|e| write_error(e.to_string()))?;
    tokio::fs::create_dir_all(target_folder)
        .await
        .map_err(|e| write_error(e.to_string()))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| write_error(e.to_string()))?;

    Ok(path)
}

// ==========================================
// ExchangeExporter
// ==========================================
pub struct ExchangeExporter<'a> {
    tenant: &'a str,
    regulation: &'a str,
    target: ImportTarget,
    target_folder: &'a Path,
    backend: Option<&'a dyn ExchangeImporter>,
}

impl<'a> ExchangeExporter<'a> {
    /// 创建导出器
    ///
    /// # 错误
    /// - BackendUnavailable: 目标包含后端但未提供后端导入器
    pub fn new(
        tenant: &'a str,
        regulation: &'a str,
        target: ImportTarget,
        target_folder: &'a Path,
        backend: Option<&'a dyn ExchangeImporter>,
    ) -> ImportResult<Self> {
        if target.uses_backend() && backend.is_none() {
            return Err(ImportError::BackendUnavailable);
        }
        Ok(Self {
            tenant,
            regulation,
            target,
            target_folder,
            backend,
        })
    }

    /// 导出一个切片
    pub async fn export(&self, lookup_name: &str, slice: LookupSlice) -> ImportResult<SliceExport> {
        let index = slice.index;
        let update_mode = slice.update_mode;
        let value_count = slice.values.len();
        let exchange = Exchange::for_lookup(
            self.tenant,
            self.regulation,
            slice.into_lookup_set(lookup_name),
        );

        let file = if self.target.writes_file() {
            let file_name = exchange_file_name(lookup_name, index);
            let path = write_exchange_file(self.target_folder, &file_name, &exchange).await?;
            debug!(file = %path.display(), values = value_count, "交换文件已写出");
            Some(path)
        } else {
            None
        };

        let backend_values = match (self.target.uses_backend(), self.backend) {
            (true, Some(backend)) => {
                let imported = backend
                    .import_exchange(&exchange)
                    .await
                    .map_err(|source| ImportError::BackendImportError {
                        lookup: lookup_name.to_string(),
                        source,
                    })?;
                debug!(lookup = lookup_name, values = imported, "后端导入完成");
                Some(imported)
            }
            _ => None,
        };

        Ok(SliceExport {
            index,
            update_mode,
            value_count,
            file,
            backend_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lookup::LookupValue;
    use async_trait::async_trait;
    use std::error::Error;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct RecordingBackend {
        received: Mutex<Vec<Exchange>>,
    }

    #[async_trait]
    impl ExchangeImporter for RecordingBackend {
        async fn import_exchange(
            &self,
            exchange: &Exchange,
        ) -> Result<usize, Box<dyn Error + Send + Sync>> {
            let count = exchange.lookups().map(|(_, _, l)| l.values.len()).sum();
            self.received.lock().unwrap().push(exchange.clone());
            Ok(count)
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ExchangeImporter for FailingBackend {
        async fn import_exchange(
            &self,
            _exchange: &Exchange,
        ) -> Result<usize, Box<dyn Error + Send + Sync>> {
            Err("连接被拒绝".into())
        }
    }

    fn slice(index: Option<usize>, update_mode: UpdateMode) -> LookupSlice {
        LookupSlice {
            index,
            update_mode,
            values: vec![LookupValue {
                key: Some("A".to_string()),
                value: Some("1".to_string()),
                ..LookupValue::default()
            }],
        }
    }

    #[test]
    fn test_exchange_file_names() {
        assert_eq!(exchange_file_name("Rates", None), "Rates.json");
        assert_eq!(exchange_file_name("Rates", Some(1)), "Rates_01.json");
        assert_eq!(exchange_file_name("Rates", Some(99)), "Rates_99.json");
        assert_eq!(exchange_file_name("Rates", Some(100)), "Rates_100.json");
        assert_eq!(exchange_file_name("Rates", Some(123)), "Rates_123.json");
    }

    #[tokio::test]
    async fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let exporter =
            ExchangeExporter::new("Acme", "Payroll", ImportTarget::File, dir.path(), None).unwrap();

        let result = exporter
            .export("Rates", slice(Some(2), UpdateMode::NoUpdate))
            .await
            .unwrap();

        let path = result.file.unwrap();
        assert_eq!(path, dir.path().join("Rates_02.json"));
        assert_eq!(result.backend_values, None);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "应为缩进 JSON");
        let exchange: Exchange = serde_json::from_str(&text).unwrap();
        let (tenant, regulation, lookup) = exchange.lookups().next().unwrap();
        assert_eq!(tenant.identifier, "Acme");
        assert_eq!(regulation.name, "Payroll");
        assert_eq!(lookup.name, "Rates");
        assert_eq!(lookup.update_mode, UpdateMode::NoUpdate);
    }

    #[tokio::test]
    async fn test_export_creates_missing_folder() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("out").join("lookups");
        let exporter =
            ExchangeExporter::new("Acme", "Payroll", ImportTarget::File, &folder, None).unwrap();

        let result = exporter.export("Rates", slice(None, UpdateMode::Update)).await.unwrap();
        assert_eq!(result.file, Some(folder.join("Rates.json")));
    }

    #[tokio::test]
    async fn test_export_to_both_targets() {
        let dir = tempdir().unwrap();
        let backend = RecordingBackend {
            received: Mutex::new(Vec::new()),
        };
        let exporter = ExchangeExporter::new(
            "Acme",
            "Payroll",
            ImportTarget::Both,
            dir.path(),
            Some(&backend),
        )
        .unwrap();

        let result = exporter.export("Rates", slice(None, UpdateMode::Update)).await.unwrap();

        assert!(result.file.is_some());
        assert_eq!(result.backend_values, Some(1));
        assert_eq!(backend.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_only_writes_no_file() {
        let dir = tempdir().unwrap();
        let backend = RecordingBackend {
            received: Mutex::new(Vec::new()),
        };
        let exporter = ExchangeExporter::new(
            "Acme",
            "Payroll",
            ImportTarget::Backend,
            dir.path(),
            Some(&backend),
        )
        .unwrap();

        let result = exporter.export("Rates", slice(None, UpdateMode::Update)).await.unwrap();
        assert_eq!(result.file, None);
        assert!(!dir.path().join("Rates.json").exists());
    }

    #[tokio::test]
    async fn test_no_target_exports_nothing() {
        let dir = tempdir().unwrap();
        let exporter =
            ExchangeExporter::new("Acme", "Payroll", ImportTarget::None, dir.path(), None).unwrap();

        let result = exporter.export("Rates", slice(None, UpdateMode::Update)).await.unwrap();
        assert_eq!(result.value_count, 1);
        assert_eq!(result.file, None);
        assert_eq!(result.backend_values, None);
        assert!(!dir.path().join("Rates.json").exists());
    }

    #[test]
    fn test_backend_target_requires_backend() {
        let dir = tempdir().unwrap();
        let err = ExchangeExporter::new("Acme", "Payroll", ImportTarget::Backend, dir.path(), None)
            .err()
            .unwrap();
        assert!(matches!(err, ImportError::BackendUnavailable));
    }

    #[tokio::test]
    async fn test_backend_error_propagates_after_file_written() {
        let dir = tempdir().unwrap();
        let backend = FailingBackend;
        let exporter = ExchangeExporter::new(
            "Acme",
            "Payroll",
            ImportTarget::Both,
            dir.path(),
            Some(&backend),
        )
        .unwrap();

        let err = exporter
            .export("Rates", slice(None, UpdateMode::Update))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::BackendImportError { ref lookup, .. } if lookup == "Rates"
        ));
        let source = err.source().expect("应保留后端原始错误");
        assert_eq!(source.to_string(), "连接被拒绝");
        assert!(dir.path().join("Rates.json").exists());
    }
}
