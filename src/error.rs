use crate::distribution::DistributionError;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 权重分配输入错误
    #[error("分配参数错误: {0}")]
    Distribution(#[from] DistributionError),
    /// 题库查询错误
    #[error("题库错误: {0}")]
    Bank(#[from] BankError),
    /// 试卷保存错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 题库查询错误
#[derive(Debug, Error)]
pub enum BankError {
    /// 网络请求失败
    #[error("题库请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 题库返回错误响应
    #[error("题库返回错误响应 ({endpoint}): status={status}")]
    BadResponse { endpoint: String, status: u16 },
    /// 题库数据解析失败
    #[error("题库数据解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// 试卷保存错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 多次尝试后仍无法生成唯一编号
    #[error("无法生成唯一的试卷编号 (已尝试 {attempts} 次)")]
    CodeExhausted { attempts: usize },
    /// 序列化失败
    #[error("试卷序列化失败: {0}")]
    SerializeFailed(#[from] serde_json::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 既没有配置本地题库也没有配置远程题库
    #[error("未配置题库来源")]
    MissingQuestionBank,
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Bank(BankError::JsonParseFailed(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建题库请求失败错误
    pub fn bank_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Bank(BankError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
