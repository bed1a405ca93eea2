// ==========================================
// 查找表文本导入 - 命令行入口
// ==========================================
// 用法: lookup-text-import <job.json>
// 环境变量:
// - LOOKUP_IMPORT_DB: SQLite 数据库（配置来源 + 后端存储），缺省使用内置默认配置
// - LOOKUP_IMPORT_LOG_FORMAT=json: JSON 日志
// ==========================================

use anyhow::Context;
use lookup_text_import::{
    logging, ConfigManager, DefaultImportConfig, LookupExchangeRepository,
    LookupTextImportRequest, LookupTextImportSummary, LookupTextImporter, StdConsole,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::var("LOOKUP_IMPORT_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        logging::init_json();
    } else {
        logging::init();
    }

    let Some(job_path) = std::env::args().nth(1) else {
        eprintln!("用法: lookup-text-import <job.json>");
        return ExitCode::from(2);
    };

    tracing::info!(version = lookup_text_import::VERSION, job = %job_path, "查找表文本导入启动");

    match run(&job_path).await {
        Ok(summary) => {
            println!(
                "完成: {} 个源文件，{} 个导出单元，{} 条",
                summary.reports.len(),
                summary.total_slices(),
                summary.total_values()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "查找表文本导入失败");
            eprintln!("导入失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(job_path: &str) -> anyhow::Result<LookupTextImportSummary> {
    let job = tokio::fs::read_to_string(job_path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", job_path))?;
    let request: LookupTextImportRequest =
        serde_json::from_str(&job).with_context(|| format!("任务文件格式错误: {}", job_path))?;

    let console = Arc::new(StdConsole);
    let summary = match std::env::var("LOOKUP_IMPORT_DB") {
        Ok(db_path) => {
            let repo = Arc::new(LookupExchangeRepository::new(&db_path)?);
            let config = ConfigManager::from_connection(repo.connection())?;
            LookupTextImporter::new(config, console)
                .with_backend(repo)
                .import(&request)
                .await?
        }
        Err(_) => {
            LookupTextImporter::new(DefaultImportConfig::default(), console)
                .import(&request)
                .await?
        }
    };
    Ok(summary)
}
