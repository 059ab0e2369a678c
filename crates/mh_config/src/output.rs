// crates/mh_config/src/output.rs

//! 输出子系统的全局参数
//!
//! 诊断模块和写出后端共享的参数集中在这里注册：
//!
//! | 参数 | 默认值 | 作用 |
//! |---|---|---|
//! | `EnableVtkOutput` | `true` | 总开关，关闭时所有诊断模块跳过逐单元处理 |
//! | `VtkOutputFormat` | `"ascii"` | 数据格式，`ascii` 或 `base64` |
//! | `OutputDir` | `"."` | 输出目录 |
//! | `VtkOutputPrefix` | `"output"` | 文件名前缀 |

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::params::{ParamSpec, ParameterRegistry};

/// 总开关参数名
pub const ENABLE_VTK_OUTPUT: &str = "EnableVtkOutput";
/// 数据格式参数名
pub const VTK_OUTPUT_FORMAT: &str = "VtkOutputFormat";
/// 输出目录参数名
pub const OUTPUT_DIR: &str = "OutputDir";
/// 文件名前缀参数名
pub const VTK_OUTPUT_PREFIX: &str = "VtkOutputPrefix";

/// 注册输出子系统的全局参数
///
/// 可以被多个模块重复调用。
pub fn register_output_parameters(registry: &ParameterRegistry) -> ConfigResult<()> {
    registry.register(ParamSpec::bool(
        ENABLE_VTK_OUTPUT,
        true,
        "Global switch for turning on writing VTK files",
    ))?;
    registry.register(ParamSpec::string(
        VTK_OUTPUT_FORMAT,
        "ascii",
        "Data encoding of the VTK output files (ascii or base64)",
    ))?;
    registry.register(ParamSpec::string(
        OUTPUT_DIR,
        ".",
        "The directory to which result files are written",
    ))?;
    registry.register(ParamSpec::string(
        VTK_OUTPUT_PREFIX,
        "output",
        "File name prefix of the VTK output series",
    ))?;
    Ok(())
}

/// VTK 数据编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VtkDataFormat {
    /// 文本
    #[default]
    Ascii,
    /// 内联 base64 二进制
    Base64,
}

impl VtkDataFormat {
    /// 格式名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "base64",
        }
    }
}

impl FromStr for VtkDataFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" | "text" => Ok(Self::Ascii),
            "base64" | "binary" => Ok(Self::Base64),
            _ => Err(ConfigError::InvalidValue {
                key: VTK_OUTPUT_FORMAT.to_string(),
                value: s.to_string(),
                reason: "期望 'ascii' 或 'base64'".to_string(),
            }),
        }
    }
}

/// 写出后端使用的输出参数快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtkOutputParams {
    /// 总开关
    pub enabled: bool,
    /// 数据编码
    pub format: VtkDataFormat,
    /// 输出目录
    pub directory: PathBuf,
    /// 文件名前缀
    pub prefix: String,
}

impl Default for VtkOutputParams {
    fn default() -> Self {
        Self {
            enabled: true,
            format: VtkDataFormat::Ascii,
            directory: PathBuf::from("."),
            prefix: "output".to_string(),
        }
    }
}

impl VtkOutputParams {
    /// 从注册表读取
    pub fn from_registry(registry: &ParameterRegistry) -> ConfigResult<Self> {
        Ok(Self {
            enabled: registry.get_bool(ENABLE_VTK_OUTPUT)?,
            format: registry.get_string(VTK_OUTPUT_FORMAT)?.parse()?,
            directory: PathBuf::from(registry.get_string(OUTPUT_DIR)?),
            prefix: registry.get_string(VTK_OUTPUT_PREFIX)?,
        })
    }
}
