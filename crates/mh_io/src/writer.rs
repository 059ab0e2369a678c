// crates/mh_io/src/writer.rs

//! 通用写出接口
//!
//! 输出模块面对的是一个不透明的 [`OutputWriter`]。不同后端支持的提交方式不同，
//! 模块在提交前通过 [`OutputWriter::as_vtk_sink`] 查询能力：
//!
//! - 返回 `Some(sink)`：后端接受按名称提交的相/相-组分缓冲区
//! - 返回 `None`：后端不支持该格式，模块直接跳过，不视为错误
//!
//! 写出器不归输出模块所有，每次提交时由调用方传入。

use crate::error::IoResult;

/// 自由度在网格上的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DofMapping {
    /// 顶点中心格式：自由度对应网格节点，写为 PointData
    #[default]
    Vertex,
    /// 单元中心格式：自由度对应网格单元，写为 CellData
    Element,
}

impl DofMapping {
    /// VTU 数据节名称
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Vertex => "PointData",
            Self::Element => "CellData",
        }
    }
}

/// 按名称接收缓冲区的写出能力
///
/// 缓冲区按值传入：后端保留自己的副本直到本次写出结束，模块的缓冲区所有权不变。
pub trait VtkBufferSink {
    /// 提交每相一个数组的缓冲区，外层长度为相数
    fn commit_phase_buffer(&mut self, name: &str, buffer: Vec<Vec<f64>>);

    /// 提交每相每组分一个数组的缓冲区，外层为相、内层为组分
    fn commit_phase_component_buffer(&mut self, name: &str, buffer: Vec<Vec<Vec<f64>>>);
}

/// 通用写出后端
pub trait OutputWriter: Send {
    /// 后端格式名称（用于日志）
    fn format_name(&self) -> &'static str;

    /// 开始一个输出步
    fn begin_write(&mut self, time: f64) -> IoResult<()>;

    /// 结束当前输出步并落盘
    fn end_write(&mut self) -> IoResult<()>;

    /// 能力查询：是否支持按名称提交缓冲区
    fn as_vtk_sink(&mut self) -> Option<&mut dyn VtkBufferSink> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SummaryOnly {
        steps: usize,
    }

    impl OutputWriter for SummaryOnly {
        fn format_name(&self) -> &'static str {
            "summary"
        }

        fn begin_write(&mut self, _time: f64) -> IoResult<()> {
            Ok(())
        }

        fn end_write(&mut self) -> IoResult<()> {
            self.steps += 1;
            Ok(())
        }
    }

    #[test]
    fn test_default_capability_is_none() {
        let mut w = SummaryOnly { steps: 0 };
        assert!(w.as_vtk_sink().is_none());
        w.begin_write(0.0).unwrap();
        w.end_write().unwrap();
        assert_eq!(w.steps, 1);
    }

    #[test]
    fn test_section_names() {
        assert_eq!(DofMapping::Vertex.section_name(), "PointData");
        assert_eq!(DofMapping::Element.section_name(), "CellData");
    }
}
