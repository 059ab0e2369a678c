// crates/mh_io/src/exporters/mod.rs

//! 数据导出模块
//!
//! 提供实现 [`crate::OutputWriter`] 的具体写出后端。

pub mod multi_writer;

// 重导出
pub use multi_writer::{PvdEntry, VtkMultiWriter};
