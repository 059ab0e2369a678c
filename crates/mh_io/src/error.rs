// crates/mh_io/src/error.rs
//! IO 错误类型定义
//!
//! 提供 IO 模块的统一错误枚举，通过 thiserror 自动转换底层错误。
//! 所有错误最终可转换为 MhError 以实现跨层错误传递。

use mh_foundation::MhError;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 底层文件错误
    #[error("文件写入失败: {path}: {source}")]
    File {
        /// 文件路径
        path: String,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 写出状态错误（例如未调用 begin_write 就调用 end_write）
    #[error("写出状态错误: {operation} - {reason}")]
    InvalidState {
        /// 操作名称
        operation: &'static str,
        /// 原因
        reason: String,
    },

    /// 字段长度与自由度数不一致
    #[error("字段长度不匹配: {field} 期望 {expected}, 实际 {actual}")]
    FieldSizeMismatch {
        /// 字段名
        field: String,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 基础层错误转换
    #[error("基础层错误: {0}")]
    Foundation(#[from] MhError),
}

impl IoError {
    /// 附带路径的文件错误
    pub fn file(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::File {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl From<IoError> for MhError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::File { path, source } => {
                MhError::io_with_source(format!("文件写入失败: {path}"), source)
            }
            IoError::InvalidState { operation, reason } => {
                MhError::internal(format!("写出状态错误 [{operation}]: {reason}"))
            }
            IoError::FieldSizeMismatch {
                field,
                expected,
                actual,
            } => MhError::invalid_input(format!(
                "字段 {field} 长度不匹配 (期望 {expected}, 实际 {actual})"
            )),
            IoError::Foundation(mh_err) => mh_err,
        }
    }
}
