use crate::models::question::QuestionBankItem;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载整个题库（顶层为题目数组）
pub async fn load_question_bank(json_file_path: &Path) -> Result<Vec<QuestionBankItem>> {
    let content = fs::read_to_string(json_file_path)
        .await
        .with_context(|| format!("无法读取题库文件: {}", json_file_path.display()))?;

    let items: Vec<QuestionBankItem> = serde_json::from_str(&content)
        .with_context(|| format!("无法解析题库文件: {}", json_file_path.display()))?;

    tracing::info!("题库加载完成: {} 道题", items.len());
    Ok(items)
}
