// crates/mh_config/src/error.rs

//! 配置层错误类型

use mh_foundation::MhError;

/// 配置层结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 参数名
        key: String,
        /// 参数值
        value: String,
        /// 原因
        reason: String,
    },

    /// 未注册的参数
    #[error("未注册的参数: {0}")]
    UnknownParameter(String),

    /// 参数类型不匹配
    #[error("参数 '{name}' 类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        /// 参数名
        name: String,
        /// 注册时的类型
        expected: &'static str,
        /// 实际提供的类型
        actual: &'static str,
    },

    /// 同名参数以不同默认值重复注册
    #[error("参数 '{0}' 重复注册且默认值不一致")]
    DuplicateParameter(String),

    /// 注册阶段已结束
    #[error("注册阶段已结束，无法注册参数 '{0}'")]
    RegistrationClosed(String),
}

impl From<ConfigError> for MhError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => MhError::io_with_source("读取参数文件失败", e),
            ConfigError::Parse(msg) => MhError::config(format!("参数解析失败: {msg}")),
            ConfigError::InvalidValue { key, value, reason } => {
                MhError::invalid_config(key, value, reason)
            }
            ConfigError::UnknownParameter(name) => MhError::missing_config(name),
            ConfigError::TypeMismatch {
                name,
                expected,
                actual,
            } => MhError::invalid_config(name, actual, format!("期望类型 {expected}")),
            ConfigError::DuplicateParameter(name) => {
                MhError::config(format!("参数 '{name}' 重复注册"))
            }
            ConfigError::RegistrationClosed(name) => {
                MhError::config(format!("注册阶段已结束: {name}"))
            }
        }
    }
}
