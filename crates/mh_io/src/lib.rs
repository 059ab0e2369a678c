// crates/mh_io/src/lib.rs

//! MariHydro IO 模块
//!
//! 提供诊断输出的写出后端。
//!
//! # 模块
//!
//! - [`writer`]: 通用写出接口 `OutputWriter` 与可选能力 `VtkBufferSink`
//! - [`grid`]: 写出所需的网格几何 `VtkGrid`，以及结构化网格实现
//! - [`exporters`]: 具体后端（`VtkMultiWriter`：VTU 时间序列 + PVD 集合文件）
//! - [`vtu`]: VTU DataArray 编码（ASCII / 内联 base64）
//! - [`error`]: IO 错误类型
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use mh_io::{OutputWriter, StructuredGrid, VtkMultiWriter, DofMapping};
//!
//! let grid = StructuredGrid::new(10, 10, [0.0, 0.0], [1.0, 1.0]);
//! let mut writer = VtkMultiWriter::new(grid, DofMapping::Vertex, "out", "groundwater");
//! writer.begin_write(0.0)?;
//! // 输出模块在这里提交缓冲区
//! writer.end_write()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod exporters;
pub mod grid;
pub mod vtu;
pub mod writer;

// 重导出常用类型
pub use error::{IoError, IoResult};
pub use exporters::{PvdEntry, VtkMultiWriter};
pub use grid::{StructuredGrid, VtkGrid};
pub use writer::{DofMapping, OutputWriter, VtkBufferSink};

/// 类型别名简化
pub type Result<T> = IoResult<T>;
