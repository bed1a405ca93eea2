// ==========================================
// 查找表文本导入 - 协作方 Trait
// ==========================================
// ExchangeImporter: 后端批量导入（交换文档的最终消费者）
// ImportConsole: 控制台/进度输出
// 职责: 只定义接口，便于在测试中替换
// ==========================================

use crate::domain::exchange::Exchange;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ExchangeImporter Trait
// ==========================================
// 用途: 将交换文档交给后端导入管道
// 实现者: LookupExchangeRepository（SQLite）
#[async_trait]
pub trait ExchangeImporter: Send + Sync {
    /// 导入交换文档
    ///
    /// # 返回
    /// - Ok(usize): 后端写入的查找表条目数
    /// - Err: 后端错误（原样上抛，已写出的切片文件不回滚）
    async fn import_exchange(
        &self,
        exchange: &Exchange,
    ) -> Result<usize, Box<dyn Error + Send + Sync>>;
}

// ==========================================
// ImportConsole Trait
// ==========================================
// 用途: 面向用户的结果输出（与 tracing 日志分离）
// 实现者: StdConsole
pub trait ImportConsole: Send + Sync {
    fn write_line(&self, message: &str);

    fn write_success_line(&self, message: &str);

    fn write_error_line(&self, message: &str);
}

/// 标准输出控制台
pub struct StdConsole;

impl ImportConsole for StdConsole {
    fn write_line(&self, message: &str) {
        println!("{}", message);
    }

    fn write_success_line(&self, message: &str) {
        println!("✔ {}", message);
    }

    fn write_error_line(&self, message: &str) {
        eprintln!("✘ {}", message);
    }
}
