// crates/mh_diagnostics/src/module.rs

//! 输出模块契约
//!
//! 所有诊断输出模块实现 [`OutputModule`]，由 [`crate::OutputModuleManager`]
//! 按周期驱动：
//!
//! ```text
//! alloc_buffers(num_dof) ─> process_element(ctx) × N ─> commit_buffers(writer)
//! ```
//!
//! [`ModuleCore`] 封装各模块共有的部分：开关缓存、缓冲区集合、能力检查后的提交。
//! 具体模块只负责从单元上下文中取出各自的量。

use std::sync::Arc;

use mh_config::ParamSource;
use mh_io::OutputWriter;
use mh_runtime::RuntimeScalar;

use crate::buffer::{phase_component_to_output, phase_to_output, BufferSet, BufferWrite, QuantityBuffer};
use crate::context::ElementContext;
use crate::flags::FlagCache;
use crate::quantity::QuantitySpec;

/// 输出时读取的时间层
pub const TIME_IDX: usize = 0;

/// 流体系统的相数和组分数
///
/// 对一个模块实例固定不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FluidLayout {
    /// 相数
    pub num_phases: usize,
    /// 组分数
    pub num_components: usize,
}

impl FluidLayout {
    /// 创建
    pub const fn new(num_phases: usize, num_components: usize) -> Self {
        Self {
            num_phases,
            num_components,
        }
    }
}

/// 诊断输出模块
pub trait OutputModule<C: ElementContext>: Send {
    /// 模块名称（用于日志）
    fn name(&self) -> &'static str;

    /// 为启用的量分配 `num_dof` 大小的全零缓冲区
    fn alloc_buffers(&mut self, num_dof: usize);

    /// 处理一个单元，把启用的量写入缓冲区
    fn process_element(&mut self, ctx: &C);

    /// 按顺序处理一批单元
    ///
    /// 结果必须与逐个调用 [`OutputModule::process_element`] 相同。
    fn process_elements(&mut self, ctxs: &[C]) {
        for ctx in ctxs {
            self.process_element(ctx);
        }
    }

    /// 把启用的缓冲区提交给写出后端
    ///
    /// 后端不支持按名称提交时什么也不做。
    fn commit_buffers(&self, writer: &mut dyn OutputWriter);
}

// =============================================================================
// ModuleCore
// =============================================================================

/// 模块共享实现
#[derive(Debug)]
pub struct ModuleCore<S> {
    name: &'static str,
    layout: FluidLayout,
    flags: FlagCache,
    buffers: BufferSet<S>,
}

impl<S: RuntimeScalar> ModuleCore<S> {
    /// 创建，开关在首次使用时解析
    pub fn new(
        name: &'static str,
        specs: &'static [QuantitySpec],
        layout: FluidLayout,
        source: Arc<dyn ParamSource>,
    ) -> Self {
        Self {
            name,
            layout,
            flags: FlagCache::new(specs, source),
            buffers: BufferSet::new(specs.len()),
        }
    }

    /// 模块名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 相数和组分数
    pub fn layout(&self) -> FluidLayout {
        self.layout
    }

    /// 开关缓存
    pub fn flags(&self) -> &FlagCache {
        &self.flags
    }

    /// 缓冲区
    pub fn buffers(&self) -> &BufferSet<S> {
        &self.buffers
    }

    /// 同时借出开关（只读）和缓冲区（可写）
    pub fn split_mut(&mut self) -> (&FlagCache, &mut BufferSet<S>) {
        (&self.flags, &mut self.buffers)
    }

    /// 总开关，缓存语义见 [`FlagCache::gate_enabled`]
    pub fn gate_enabled(&self) -> bool {
        self.flags.gate_enabled()
    }

    /// 分配缓冲区
    pub fn alloc_buffers(&mut self, num_dof: usize) {
        self.buffers.allocate(&self.flags, self.layout, num_dof);
        log::debug!(
            "{}: 分配缓冲区 num_dof={}，启用 {:?}",
            self.name,
            num_dof,
            self.enabled_names()
        );
    }

    /// 按单元顺序回放并行阶段收集的写入
    pub fn scatter(&mut self, batches: Vec<Vec<BufferWrite<S>>>) {
        for batch in batches {
            self.buffers.apply(batch);
        }
    }

    /// 能力检查后按名称提交启用的缓冲区
    pub fn commit_buffers(&self, writer: &mut dyn OutputWriter) {
        let format = writer.format_name();
        let Some(sink) = writer.as_vtk_sink() else {
            log::debug!("{}: 写出后端 {} 不接受缓冲区，跳过", self.name, format);
            return;
        };

        let mut committed = 0usize;
        for (slot, spec) in self.flags.specs().iter().enumerate() {
            if !self.flags.is_enabled_at(slot) {
                continue;
            }
            match self.buffers.get(slot) {
                Some(QuantityBuffer::Phase(buf)) => {
                    sink.commit_phase_buffer(spec.name, phase_to_output(buf));
                    committed += 1;
                }
                Some(QuantityBuffer::PhaseComponent(buf)) => {
                    sink.commit_phase_component_buffer(spec.name, phase_component_to_output(buf));
                    committed += 1;
                }
                None => log::warn!("{}: {} 已启用但未分配缓冲区", self.name, spec.name),
            }
        }
        log::debug!("{}: 向 {} 提交 {} 个缓冲区", self.name, format, committed);
    }

    fn enabled_names(&self) -> Vec<&'static str> {
        self.flags
            .specs()
            .iter()
            .enumerate()
            .filter(|(slot, _)| self.buffers.is_allocated(*slot))
            .map(|(_, spec)| spec.name)
            .collect()
    }
}
