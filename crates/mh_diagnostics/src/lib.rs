// crates/mh_diagnostics/src/lib.rs

//! MariHydro Diagnostics Layer (Layer 4)
//!
//! 诊断输出模块。
//!
//! 按需计算、缓存并导出派生物理量（曲折度、分子扩散系数、有效扩散系数……），
//! 用户未选择的量既不计算也不分配存储。
//!
//! # 数据流
//!
//! ```text
//! ParameterRegistry ─> FlagCache (首次查询时解析，之后不再变化)
//!                  ─> BufferSet::allocate (按开关和相/组分/自由度数分配)
//!                  ─> process_element × N (逐单元物化强度量并写入缓冲区)
//!                  ─> commit_buffers (能力检查后按名称提交给写出后端)
//! ```
//!
//! # 模块
//!
//! - [`quantity`]: 可选输出量的声明（缓冲区名、参数名、默认值、描述、形状）
//! - [`flags`]: `FlagCache` 开关缓存
//! - [`buffer`]: `BufferSet` 与相/相-组分缓冲区
//! - [`context`]: 外部协作者接口 `ElementContext`、`DiffusionIntensiveQuantities`
//! - [`module`]: 通用输出模块契约 `OutputModule` 与共享实现 `ModuleCore`
//! - [`diffusion`]: 扩散量输出模块 `VtkDiffusionModule`
//! - [`manager`]: 多模块生命周期驱动 `OutputModuleManager`
//!
//! # 生命周期
//!
//! ```text
//! register_parameters (进程内一次) ─> new
//!   ─> { alloc_buffers ─> process_element* ─> commit_buffers }*
//! ```
//!
//! 自由度数变化（网格加密）时重新调用 `alloc_buffers` 即可。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod context;
pub mod diffusion;
pub mod flags;
pub mod manager;
pub mod module;
pub mod quantity;

/// 层级标识
pub const LAYER: u8 = 4;

// 重导出常用类型
pub use buffer::{BufferSet, BufferWrite, PhaseBuffer, PhaseComponentBuffer, QuantityBuffer, ValueSink};
pub use context::{DiffusionIntensiveQuantities, ElementContext};
pub use diffusion::VtkDiffusionModule;
pub use flags::FlagCache;
pub use manager::OutputModuleManager;
pub use module::{FluidLayout, ModuleCore, OutputModule, TIME_IDX};
pub use quantity::{BufferShape, QuantitySpec};

/// Prelude 模块
pub mod prelude {
    //! 常用类型预导入
    pub use crate::{
        DiffusionIntensiveQuantities, ElementContext, FluidLayout, OutputModule,
        OutputModuleManager, VtkDiffusionModule,
    };
}
