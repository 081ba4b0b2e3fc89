use thiserror::Error;

/// check-break 的错误类型定义
#[derive(Error, Debug)]
pub enum CheckBreakError {
    #[error("Git repository error: {0}")]
    GitError(String),

    #[error("Path {0} doesn't exist")]
    InvalidPath(String),

    #[error("The object {0} doesn't exist")]
    UnknownRevision(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Report rendering error: {0}")]
    RenderError(String),
}

/// 项目通用的 Result 类型别名
pub type Result<T> = std::result::Result<T, CheckBreakError>;
