//! 试卷保存服务 - 业务能力层
//!
//! 每套试卷保存为输出目录下的一个 JSON 文件，文件名即试卷编号

use crate::error::{AppError, AppResult, StoreError};
use crate::models::test_plan::{TestDefinition, TestKind};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// 保存结果：成功时带试卷编号，失败时带原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResponse {
    pub fn saved(test_code: impl Into<String>) -> Self {
        Self {
            success: true,
            test_code: Some(test_code.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            test_code: None,
            message: Some(message.into()),
        }
    }
}

/// 试卷保存能力
pub trait TestStore {
    fn save_generated_test(
        &self,
        definition: &TestDefinition,
    ) -> impl Future<Output = AppResult<SaveResponse>> + Send;
}

/// 生成试卷编号: `<CW|FL>-YYYYMMDD-NNNN`
pub fn generate_test_code(kind: TestKind) -> String {
    let number: u16 = rand::thread_rng().gen_range(0..10_000);
    format!(
        "{}-{}-{:04}",
        kind.code_prefix(),
        chrono::Local::now().format("%Y%m%d"),
        number
    )
}

/// 校验试卷编号格式
pub fn is_valid_test_code(code: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(CW|FL)-\d{8}-\d{4}$").expect("valid test code pattern"))
        .is_match(code)
}

/// 基于文件系统的试卷存储
#[derive(Debug, Clone)]
pub struct JsonTestStore {
    output_folder: PathBuf,
    max_attempts: usize,
}

impl JsonTestStore {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            max_attempts: 20,
        }
    }

    fn path_for(&self, code: &str) -> PathBuf {
        self.output_folder.join(format!("{}.json", code))
    }

    /// 按编号读取已保存的试卷，不存在时返回 `None`
    pub async fn load_test(&self, code: &str) -> AppResult<Option<TestDefinition>> {
        if !is_valid_test_code(code) {
            return Ok(None);
        }

        let path = self.path_for(code);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::file_read_failed(path.display().to_string(), e)),
        };

        Ok(Some(serde_json::from_str(&content).map_err(StoreError::from)?))
    }
}

impl TestStore for JsonTestStore {
    async fn save_generated_test(&self, definition: &TestDefinition) -> AppResult<SaveResponse> {
        fs::create_dir_all(&self.output_folder)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_folder.display().to_string(), e))?;

        for attempt in 1..=self.max_attempts {
            let code = generate_test_code(definition.kind);
            let path = self.path_for(&code);

            let mut stored = definition.clone();
            stored.test_code = Some(code.clone());
            let body = serde_json::to_vec_pretty(&stored).map_err(StoreError::from)?;

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("试卷编号冲突 (第 {} 次): {}", attempt, code);
                    continue;
                }
                Err(e) => return Err(AppError::file_write_failed(path.display().to_string(), e)),
            };

            write_or_remove(&mut file, &path, &body).await?;

            return Ok(SaveResponse::saved(code));
        }

        let err = StoreError::CodeExhausted {
            attempts: self.max_attempts,
        };
        warn!("⚠️ {}", err);
        Ok(SaveResponse::failed(err.to_string()))
    }
}

/// 写入试卷内容；失败时删除已创建的文件，避免留下半截文件占用编号
async fn write_or_remove<W>(writer: &mut W, path: &Path, body: &[u8]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(body).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!("⚠️ 无法删除写入失败的文件 {}: {}", path.display(), remove_err);
        }
        return Err(AppError::file_write_failed(path.display().to_string(), e));
    }

    Ok(())
}
