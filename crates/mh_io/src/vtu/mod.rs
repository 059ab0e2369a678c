// crates/mh_io/src/vtu/mod.rs
//! VTU 格式支持模块
//!
//! 提供 VTK Unstructured Grid 中 DataArray 的编码。

pub mod encoder;

pub use encoder::{byte_order, write_data_array, xml_escape, VtkDataType};
