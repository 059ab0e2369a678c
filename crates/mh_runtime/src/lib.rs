// crates/mh_runtime/src/lib.rs

//! MariHydro Runtime Layer (Layer 2)
//!
//! 运行时数值抽象层，为诊断输出提供标量契约，并把 num-dual 的对偶数接入物化接口。
//!
//! # 模块概览
//!
//! - [`scalar`]: RuntimeScalar trait（普通浮点标量契约）
//! - [`materialize`]: `Materialize` trait，把对偶数等可微分值剥离为普通标量
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: mh_cli         ─> 演示程序
//! Layer 4: mh_diagnostics ─> OutputModule, VtkDiffusionModule
//! Layer 3: mh_io          ─> OutputWriter, VtkMultiWriter
//! Layer 2: mh_config      ─> ParameterRegistry
//! Layer 2: mh_runtime     ─> RuntimeScalar, Materialize (本层)
//! Layer 1: mh_foundation  ─> MhError, DofIndex
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod materialize;
pub mod scalar;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use materialize::{materialize, Materialize};
pub use scalar::RuntimeScalar;

/// Prelude 模块
pub mod prelude {
    //! 常用类型预导入
    pub use crate::{materialize, Materialize, RuntimeScalar};
}
