// crates/mh_diagnostics/src/manager.rs

//! 输出模块管理器
//!
//! 持有若干输出模块，并按输出周期统一驱动：
//!
//! ```text
//! write_step: alloc_buffers ─> process_elements ─> begin_write ─> commit_buffers × M ─> end_write
//! ```
//!
//! 写出后端不归管理器所有，每个周期由调用方传入。

use std::time::Instant;

use mh_io::{IoResult, OutputWriter};

use crate::context::ElementContext;
use crate::module::OutputModule;

/// 输出模块管理器
pub struct OutputModuleManager<C: ElementContext> {
    modules: Vec<Box<dyn OutputModule<C>>>,
    num_dof: usize,
    steps_written: usize,
}

impl<C: ElementContext> Default for OutputModuleManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ElementContext> OutputModuleManager<C> {
    /// 创建空管理器
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            num_dof: 0,
            steps_written: 0,
        }
    }

    /// 添加模块
    pub fn add_module(&mut self, module: Box<dyn OutputModule<C>>) {
        tracing::debug!("Output module registered: {}", module.name());
        self.modules.push(module);
    }

    /// 添加模块（链式）
    pub fn with_module<M: OutputModule<C> + 'static>(mut self, module: M) -> Self {
        self.add_module(Box::new(module));
        self
    }

    /// 模块数量
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// 是否没有模块
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// 模块名称
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// 最近一次分配的自由度数
    pub fn num_dof(&self) -> usize {
        self.num_dof
    }

    /// 已完成的输出步数
    pub fn steps_written(&self) -> usize {
        self.steps_written
    }

    /// 所有模块分配缓冲区
    pub fn alloc_buffers(&mut self, num_dof: usize) {
        if num_dof != self.num_dof {
            tracing::debug!("Output buffers resized: {} -> {} dof", self.num_dof, num_dof);
        }
        for module in &mut self.modules {
            module.alloc_buffers(num_dof);
        }
        self.num_dof = num_dof;
    }

    /// 所有模块处理一个单元
    pub fn process_element(&mut self, ctx: &C) {
        for module in &mut self.modules {
            module.process_element(ctx);
        }
    }

    /// 所有模块处理一批单元
    pub fn process_elements(&mut self, ctxs: &[C]) {
        for module in &mut self.modules {
            module.process_elements(ctxs);
        }
    }

    /// 把所有模块的缓冲区写为一个输出步
    pub fn commit(&mut self, writer: &mut dyn OutputWriter, time: f64) -> IoResult<()> {
        writer.begin_write(time)?;
        for module in &self.modules {
            module.commit_buffers(writer);
        }
        writer.end_write()?;
        self.steps_written += 1;
        Ok(())
    }

    /// 完整的输出周期
    pub fn write_step(
        &mut self,
        writer: &mut dyn OutputWriter,
        time: f64,
        num_dof: usize,
        ctxs: &[C],
    ) -> IoResult<()> {
        let start = Instant::now();
        self.alloc_buffers(num_dof);
        self.process_elements(ctxs);
        self.commit(writer, time)?;
        tracing::info!(
            "Output step {} written: t={}, {} dof, {} elements, {} modules ({}, {:.2}ms)",
            self.steps_written,
            time,
            num_dof,
            ctxs.len(),
            self.modules.len(),
            writer.format_name(),
            start.elapsed().as_secs_f64() * 1e3
        );
        Ok(())
    }
}
