// crates/mh_diagnostics/tests/common/mod.rs

//! 集成测试共用的桩实现

#![allow(dead_code)]

use std::sync::Arc;

use mh_config::{ParamValue, ParameterRegistry};
use mh_diagnostics::{DiffusionIntensiveQuantities, ElementContext, FluidLayout, VtkDiffusionModule};
use mh_foundation::{ComponentIndex, DofIndex, PhaseIndex};
use mh_io::{IoResult, OutputWriter, VtkBufferSink};
use num_dual::Dual64;

pub const TORTUOSITY: f64 = 0.42;
pub const DIFFUSION: f64 = 1.5e-9;
pub const EFFECTIVE: f64 = 3.0e-10;

pub const LAYOUT: FluidLayout = FluidLayout::new(2, 2);

/// 带一个导数的强度量
pub type Eval = Dual64;

/// 返回固定值的强度量，导数非零
#[derive(Debug, Clone, Copy)]
pub struct ConstIq {
    pub tortuosity: f64,
    pub diffusion: f64,
    pub effective: f64,
}

impl Default for ConstIq {
    fn default() -> Self {
        Self {
            tortuosity: TORTUOSITY,
            diffusion: DIFFUSION,
            effective: EFFECTIVE,
        }
    }
}

impl DiffusionIntensiveQuantities for ConstIq {
    type Evaluation = Eval;

    fn tortuosity(&self, _phase: PhaseIndex) -> Eval {
        Eval::new(self.tortuosity, 1.0)
    }

    fn diffusion_coefficient(&self, _phase: PhaseIndex, _comp: ComponentIndex) -> Eval {
        Eval::new(self.diffusion, 1.0)
    }

    fn effective_diffusion_coefficient(&self, _phase: PhaseIndex, _comp: ComponentIndex) -> Eval {
        Eval::new(self.effective, 1.0)
    }
}

/// 每个局部自由度带自己的强度量
#[derive(Debug, Clone)]
pub struct StubElement {
    pub dofs: Vec<usize>,
    pub iqs: Vec<ConstIq>,
}

impl StubElement {
    /// 所有自由度使用相同强度量
    pub fn uniform(dofs: &[usize], iq: ConstIq) -> Self {
        Self {
            dofs: dofs.to_vec(),
            iqs: vec![iq; dofs.len()],
        }
    }
}

impl ElementContext for StubElement {
    type IntensiveQuantities = ConstIq;

    fn num_primary_dof(&self, _time_idx: usize) -> usize {
        self.dofs.len()
    }

    fn global_space_index(&self, local_dof: usize, _time_idx: usize) -> DofIndex {
        DofIndex::new(self.dofs[local_dof])
    }

    fn intensive_quantities(&self, local_dof: usize, _time_idx: usize) -> &ConstIq {
        &self.iqs[local_dof]
    }
}

/// 注册参数并设置三个开关和总开关
pub fn registry(tortuosity: bool, diffusion: bool, effective: bool, gate: bool) -> Arc<ParameterRegistry> {
    let reg = ParameterRegistry::new();
    VtkDiffusionModule::<f64>::register_parameters(&reg).unwrap();
    reg.end_registration();
    reg.set("VtkWriteTortuosities", ParamValue::Bool(tortuosity)).unwrap();
    reg.set("VtkWriteDiffusionCoefficients", ParamValue::Bool(diffusion)).unwrap();
    reg.set("VtkWriteEffectiveDiffusionCoefficients", ParamValue::Bool(effective))
        .unwrap();
    reg.set("EnableVtkOutput", ParamValue::Bool(gate)).unwrap();
    Arc::new(reg)
}

pub fn module(tortuosity: bool, diffusion: bool, effective: bool, gate: bool) -> VtkDiffusionModule<f64> {
    VtkDiffusionModule::new(LAYOUT, registry(tortuosity, diffusion, effective, gate))
}

/// 提交记录
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Phase(String, Vec<Vec<f64>>),
    PhaseComponent(String, Vec<Vec<Vec<f64>>>),
}

impl Commit {
    pub fn name(&self) -> &str {
        match self {
            Commit::Phase(name, _) | Commit::PhaseComponent(name, _) => name,
        }
    }
}

/// 记录所有提交的写出后端
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub commits: Vec<Commit>,
    pub steps: Vec<f64>,
}

impl VtkBufferSink for RecordingWriter {
    fn commit_phase_buffer(&mut self, name: &str, buffer: Vec<Vec<f64>>) {
        self.commits.push(Commit::Phase(name.to_string(), buffer));
    }

    fn commit_phase_component_buffer(&mut self, name: &str, buffer: Vec<Vec<Vec<f64>>>) {
        self.commits.push(Commit::PhaseComponent(name.to_string(), buffer));
    }
}

impl OutputWriter for RecordingWriter {
    fn format_name(&self) -> &'static str {
        "recording"
    }

    fn begin_write(&mut self, time: f64) -> IoResult<()> {
        self.steps.push(time);
        Ok(())
    }

    fn end_write(&mut self) -> IoResult<()> {
        Ok(())
    }

    fn as_vtk_sink(&mut self) -> Option<&mut dyn VtkBufferSink> {
        Some(self)
    }
}

/// 不接受缓冲区的写出后端
#[derive(Debug, Default)]
pub struct SummaryWriter {
    pub steps: usize,
}

impl OutputWriter for SummaryWriter {
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
