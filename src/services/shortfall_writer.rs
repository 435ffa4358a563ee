//! 题量不足报告 - 业务能力层
//!
//! 只负责把缺口追加写入报告文件，不关心流程

use crate::error::{AppError, AppResult};
use crate::services::sampler::Shortfall;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 题量不足报告写入服务
pub struct ShortfallWriter {
    report_path: String,
}

impl ShortfallWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_path
    }

    /// 追加一套试卷的全部缺口
    pub async fn write(&self, plan_name: &str, shortfalls: &[Shortfall]) -> AppResult<()> {
        if shortfalls.is_empty() {
            return Ok(());
        }

        debug!("写入题量不足报告: 计划 {} | {} 条", plan_name, shortfalls.len());

        let mut content = String::new();
        for shortfall in shortfalls {
            content.push_str(&format_line(plan_name, shortfall));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.report_path, e))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.report_path, e))?;

        Ok(())
    }
}

fn format_line(plan_name: &str, shortfall: &Shortfall) -> String {
    format!(
        "计划 {} | 科目 {} | 章节 {} | 需要 {} | 可用 {}\n",
        plan_name,
        shortfall.subject,
        shortfall.lesson.as_deref().unwrap_or("-"),
        shortfall.requested,
        shortfall.available
    )
}
