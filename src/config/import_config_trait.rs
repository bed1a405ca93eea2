// ==========================================
// 查找表文本导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::ImportTarget;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::PathBuf;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）、DefaultImportConfig（内置默认值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 切片大小
    ///
    /// # 默认值
    /// - 0（不切片）
    async fn get_slice_size(&self) -> ImportResult<usize>;

    /// 交换文件输出目录
    ///
    /// # 默认值
    /// - 当前工作目录
    async fn get_target_folder(&self) -> ImportResult<PathBuf>;

    /// 导入目标
    ///
    /// # 默认值
    /// - FILE
    async fn get_import_target(&self) -> ImportResult<ImportTarget>;
}

// ==========================================
// DefaultImportConfig - 内置默认值
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultImportConfig {
    pub slice_size: usize,
    pub target_folder: PathBuf,
    pub import_target: ImportTarget,
}

impl Default for DefaultImportConfig {
    fn default() -> Self {
        Self {
            slice_size: 0,
            target_folder: PathBuf::from("."),
            import_target: ImportTarget::File,
        }
    }
}

#[async_trait]
impl ImportConfigReader for DefaultImportConfig {
    async fn get_slice_size(&self) -> ImportResult<usize> {
        Ok(self.slice_size)
    }

    async fn get_target_folder(&self) -> ImportResult<PathBuf> {
        Ok(self.target_folder.clone())
    }

    async fn get_import_target(&self) -> ImportResult<ImportTarget> {
        Ok(self.import_target)
    }
}
