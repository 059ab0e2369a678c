// crates/mh_diagnostics/src/diffusion.rs

//! 扩散量输出模块
//!
//! 按需导出三个量：
//!
//! | 缓冲区名 | 开关参数 | 形状 |
//! |---|---|---|
//! | `tortuosity` | `VtkWriteTortuosities` | `[phase][dof]` |
//! | `diffusionCoefficient` | `VtkWriteDiffusionCoefficients` | `[phase][comp][dof]` |
//! | `effectiveDiffusionCoefficient` | `VtkWriteEffectiveDiffusionCoefficients` | `[phase][comp][dof]` |
//!
//! 三个开关默认关闭。总开关 `EnableVtkOutput` 关闭时不做任何逐单元工作。
//!
//! # 共享自由度
//!
//! 顶点中心离散中多个单元共享同一个全局自由度，后处理的单元覆盖先处理的单元。
//! 并行遍历先独立收集每个单元的写入，再按单元顺序回放，
//! 因此结果与顺序遍历逐位相同。
//!
//! # 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use mh_config::{ParamValue, ParameterRegistry};
//! use mh_diagnostics::{FluidLayout, VtkDiffusionModule};
//!
//! let registry = ParameterRegistry::new();
//! VtkDiffusionModule::<f64>::register_parameters(&registry).unwrap();
//! registry.end_registration();
//! registry.set("VtkWriteTortuosities", ParamValue::Bool(true)).unwrap();
//!
//! let mut module = VtkDiffusionModule::<f64>::new(FluidLayout::new(2, 2), Arc::new(registry));
//! module.alloc(10);
//! assert_eq!(module.tortuosity().unwrap().len(), 2);
//! assert!(module.diffusion_coefficient().is_none());
//! ```

use std::sync::Arc;

use mh_config::{register_output_parameters, ConfigResult, ParamSource, ParameterRegistry};
use mh_foundation::{ComponentIndex, PhaseIndex};
use mh_io::OutputWriter;
use mh_runtime::{materialize, Materialize, RuntimeScalar};

use crate::buffer::{BufferWrite, PhaseBuffer, PhaseComponentBuffer, ValueSink};
use crate::context::{DiffusionIntensiveQuantities, ElementContext};
use crate::flags::FlagCache;
use crate::module::{FluidLayout, ModuleCore, OutputModule, TIME_IDX};
use crate::quantity::{QuantitySpec, DIFFUSION_COEFFICIENT, EFFECTIVE_DIFFUSION_COEFFICIENT, TORTUOSITY};

/// 单元数达到该值时 `process_elements` 并行收集
const PARALLEL_THRESHOLD: usize = 64;

const TORTUOSITY_SLOT: usize = 0;
const DIFFUSION_SLOT: usize = 1;
const EFFECTIVE_SLOT: usize = 2;

static QUANTITIES: [QuantitySpec; 3] = [TORTUOSITY, DIFFUSION_COEFFICIENT, EFFECTIVE_DIFFUSION_COEFFICIENT];

/// 扩散量输出模块
#[derive(Debug)]
pub struct VtkDiffusionModule<S> {
    core: ModuleCore<S>,
}

impl<S: RuntimeScalar> VtkDiffusionModule<S> {
    /// 模块名称
    pub const NAME: &'static str = "diffusion";

    /// 注册本模块的参数和输出子系统的全局参数
    ///
    /// 必须在注册阶段结束前调用，重复调用无副作用。
    pub fn register_parameters(registry: &ParameterRegistry) -> ConfigResult<()> {
        register_output_parameters(registry)?;
        for spec in &QUANTITIES {
            registry.register(spec.param_spec())?;
        }
        Ok(())
    }

    /// 本模块的可选量
    pub fn quantities() -> &'static [QuantitySpec] {
        &QUANTITIES
    }

    /// 创建模块
    ///
    /// 开关在首次使用时从 `params` 解析并缓存。
    pub fn new(layout: FluidLayout, params: Arc<dyn ParamSource>) -> Self {
        Self {
            core: ModuleCore::new(Self::NAME, &QUANTITIES, layout, params),
        }
    }

    /// 相数和组分数
    pub fn layout(&self) -> FluidLayout {
        self.core.layout()
    }

    /// 开关缓存
    pub fn flags(&self) -> &FlagCache {
        self.core.flags()
    }

    /// 最近一次分配的自由度数
    pub fn num_dof(&self) -> usize {
        self.core.buffers().num_dof()
    }

    /// 分配缓冲区
    ///
    /// 与 [`OutputModule::alloc_buffers`] 相同，不需要指定单元上下文类型。
    pub fn alloc(&mut self, num_dof: usize) {
        self.core.alloc_buffers(num_dof);
    }

    /// 曲折度缓冲区，未启用时为 `None`
    pub fn tortuosity(&self) -> Option<&PhaseBuffer<S>> {
        self.core.buffers().get(TORTUOSITY_SLOT)?.as_phase()
    }

    /// 分子扩散系数缓冲区，未启用时为 `None`
    pub fn diffusion_coefficient(&self) -> Option<&PhaseComponentBuffer<S>> {
        self.core.buffers().get(DIFFUSION_SLOT)?.as_phase_component()
    }

    /// 有效扩散系数缓冲区，未启用时为 `None`
    pub fn effective_diffusion_coefficient(&self) -> Option<&PhaseComponentBuffer<S>> {
        self.core.buffers().get(EFFECTIVE_SLOT)?.as_phase_component()
    }

    /// 收集一个单元的写入
    fn collect_element<C, K>(flags: &FlagCache, layout: FluidLayout, ctx: &C, sink: &mut K)
    where
        C: ElementContext,
        C::IntensiveQuantities: DiffusionIntensiveQuantities,
        <C::IntensiveQuantities as DiffusionIntensiveQuantities>::Evaluation:
            Materialize<Scalar = S>,
        K: ValueSink<S>,
    {
        let write_tortuosity = flags.is_enabled_at(TORTUOSITY_SLOT);
        let write_diffusion = flags.is_enabled_at(DIFFUSION_SLOT);
        let write_effective = flags.is_enabled_at(EFFECTIVE_SLOT);
        if !(write_tortuosity || write_diffusion || write_effective) {
            return;
        }

        for local in 0..ctx.num_primary_dof(TIME_IDX) {
            let dof = ctx.global_space_index(local, TIME_IDX);
            let iq = ctx.intensive_quantities(local, TIME_IDX);

            for p in 0..layout.num_phases {
                let phase = PhaseIndex::new(p);
                if write_tortuosity {
                    let value = materialize(&iq.tortuosity(phase));
                    sink.store(BufferWrite::phase(TORTUOSITY_SLOT, phase, dof, value));
                }

                for c in 0..layout.num_components {
                    let comp = ComponentIndex::new(c);
                    if write_diffusion {
                        let value = materialize(&iq.diffusion_coefficient(phase, comp));
                        sink.store(BufferWrite::phase_component(DIFFUSION_SLOT, phase, comp, dof, value));
                    }
                    if write_effective {
                        let value = materialize(&iq.effective_diffusion_coefficient(phase, comp));
                        sink.store(BufferWrite::phase_component(EFFECTIVE_SLOT, phase, comp, dof, value));
                    }
                }
            }
        }
    }
}

impl<S, C> OutputModule<C> for VtkDiffusionModule<S>
where
    S: RuntimeScalar,
    C: ElementContext + Sync,
    C::IntensiveQuantities: DiffusionIntensiveQuantities,
    <C::IntensiveQuantities as DiffusionIntensiveQuantities>::Evaluation: Materialize<Scalar = S>,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn alloc_buffers(&mut self, num_dof: usize) {
        self.core.alloc_buffers(num_dof);
    }

    fn process_element(&mut self, ctx: &C) {
        if !self.core.gate_enabled() {
            return;
        }
        let layout = self.core.layout();
        let (flags, buffers) = self.core.split_mut();
        Self::collect_element(flags, layout, ctx, buffers);
    }

    fn process_elements(&mut self, ctxs: &[C]) {
        use rayon::prelude::*;

        if !self.core.gate_enabled() {
            return;
        }
        if ctxs.len() < PARALLEL_THRESHOLD {
            for ctx in ctxs {
                OutputModule::<C>::process_element(self, ctx);
            }
            return;
        }

        let layout = self.core.layout();
        let flags = self.core.flags();
        let batches: Vec<Vec<BufferWrite<S>>> = ctxs
            .par_iter()
            .map(|ctx| {
                let mut writes = Vec::new();
                Self::collect_element(flags, layout, ctx, &mut writes);
                writes
            })
            .collect();
        self.core.scatter(batches);
    }

    fn commit_buffers(&self, writer: &mut dyn OutputWriter) {
        self.core.commit_buffers(writer);
    }
}
