// crates/mh_config/src/lib.rs

//! MariHydro Config Layer (Layer 2)
//!
//! 配置层，提供运行时参数的注册、解析和查询。
//!
//! # 模块概览
//!
//! - [`params`]: `ParameterRegistry` 参数注册表和 `ParamSource` 查询接口
//! - [`output`]: 输出子系统的全局参数（总开关、格式、目录、前缀）
//! - [`error`]: 配置错误类型
//!
//! # 参数生命周期
//!
//! ```text
//! register(...)  ─> end_registration() ─> load_json_file / apply_overrides ─> get_*
//! ```
//!
//! 参数值的优先级：命令行覆盖 > JSON 参数文件 > 注册时的默认值。
//!
//! # 设计原则
//!
//! 1. **无泛型**: 本层所有类型都不包含泛型参数
//! 2. **注册即契约**: 每个参数都有名称、默认值和描述，缺省值在注册时确定
//! 3. **线程共享**: 注册表通过 `Arc<ParameterRegistry>` 在线程间共享

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod output;
pub mod params;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use error::{ConfigError, ConfigResult};
pub use output::{register_output_parameters, VtkDataFormat, VtkOutputParams};
pub use params::{ParamSource, ParamSpec, ParamValue, ParameterRegistry};
