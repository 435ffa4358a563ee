use crate::error::{AppError, FileError};
use crate::models::test_plan::TestPlan;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载组卷计划
///
/// 读取失败返回 `FileError::ReadFailed`，格式错误返回 `FileError::TomlParseFailed`
pub async fn load_plan(toml_file_path: &Path) -> Result<TestPlan> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let plan: TestPlan = toml::from_str(&content).map_err(|e| {
        AppError::from(FileError::TomlParseFailed {
            path: path_str.clone(),
            source: e,
        })
    })?;

    Ok(plan.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有组卷计划
///
/// 解析失败的文件只记录警告并跳过；结果按文件名排序，保证批处理顺序稳定
pub async fn load_all_plans(folder_path: &str) -> Result<Vec<TestPlan>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::from(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        })
        .into());
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut plans = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_plan(&path).await {
            Ok(plan) => {
                tracing::info!(
                    "成功加载计划 {} ({} 个科目, {} 题)",
                    plan.name,
                    plan.subjects.len(),
                    plan.total_questions
                );
                plans.push(plan);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_folder(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wtb-loader-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn broken_toml_is_reported_as_parse_failure() {
        let dir = temp_folder("broken");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "name = ").unwrap();

        let err = load_plan(&path).await.unwrap_err();
        let app_err = err.downcast_ref::<AppError>().expect("应为 AppError");
        match app_err {
            AppError::File(FileError::TomlParseFailed { path: p, .. }) => {
                assert!(p.ends_with("broken.toml"));
            }
            other => panic!("错误类型不符: {:?}", other),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_read_failure() {
        let dir = temp_folder("missing");
        let err = load_plan(&dir.join("absent.toml")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::File(FileError::ReadFailed { .. }))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_folder_is_reported() {
        let err = load_all_plans("/nonexistent/wtb-plans").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::File(FileError::DirectoryNotFound { .. }))
        ));
    }
}
