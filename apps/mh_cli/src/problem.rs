// apps/mh_cli/src/problem.rs

//! 非饱和带扩散示例
//!
//! 二维竖直剖面，两相（液相、气相）两组分（H2O、Air）。
//! 地下水位随时间下降，液相饱和度由毛细过渡带上的线性分布给出，
//! 强度量以 [`Dual64`] 表示，液相饱和度为自变量，对偶部即对它的导数。
//!
//! 曲折度使用 Millington–Quirk 模型：
//!
//! ```text
//! tau_α  = phi^(1/3) · S_α^(7/3)
//! D_eff  = phi · S_α · tau_α · D_α^κ
//! ```

use mh_diagnostics::{DiffusionIntensiveQuantities, ElementContext, FluidLayout};
use mh_foundation::{ComponentIndex, DofIndex, PhaseIndex};
use mh_io::{DofMapping, StructuredGrid, VtkGrid};
use num_dual::{Dual64, DualNum};

/// 以液相饱和度为自变量的可微分值
pub type Eval = Dual64;

/// 相名称
pub const PHASE_NAMES: [&str; 2] = ["liquid", "gas"];
/// 组分名称
pub const COMPONENT_NAMES: [&str; 2] = ["H2O", "Air"];
/// 流体系统
pub const LAYOUT: FluidLayout = FluidLayout::new(2, 2);

/// 分子扩散系数 [m²/s]，`[phase][comp]`
const MOLECULAR_DIFFUSION: [[f64; 2]; 2] = [[2.3e-9, 2.0e-9], [2.5e-5, 2.5e-5]];

/// 示例参数
#[derive(Debug, Clone, Copy)]
pub struct GroundwaterProblem {
    /// 初始地下水位 [m]
    pub initial_water_table: f64,
    /// 地下水位下降速度 [m/s]
    pub drawdown_rate: f64,
    /// 毛细过渡带厚度 [m]
    pub capillary_fringe: f64,
    /// 残余液相饱和度
    pub residual_saturation: f64,
    /// 顶部孔隙度
    pub porosity_top: f64,
    /// 底部孔隙度
    pub porosity_bottom: f64,
    /// 剖面高度 [m]
    pub height: f64,
}

impl Default for GroundwaterProblem {
    fn default() -> Self {
        Self {
            initial_water_table: 6.0,
            drawdown_rate: 2.0e-5,
            capillary_fringe: 1.5,
            residual_saturation: 0.1,
            porosity_top: 0.4,
            porosity_bottom: 0.3,
            height: 10.0,
        }
    }
}

impl GroundwaterProblem {
    /// 剖面上的计算网格（宽 20 m）
    pub fn grid(&self, nx: usize, ny: usize) -> StructuredGrid {
        StructuredGrid::with_extent(nx, ny, [0.0, 0.0], [20.0, self.height])
    }

    /// `t` 时刻的地下水位
    pub fn water_table(&self, time: f64) -> f64 {
        (self.initial_water_table - self.drawdown_rate * time).max(0.0)
    }

    /// 高程 `z` 处的孔隙度
    pub fn porosity(&self, z: f64) -> f64 {
        let frac = (z / self.height).clamp(0.0, 1.0);
        self.porosity_bottom + (self.porosity_top - self.porosity_bottom) * frac
    }

    /// 高程 `z` 处的液相饱和度
    pub fn liquid_saturation(&self, z: f64, time: f64) -> f64 {
        let above = z - self.water_table(time);
        if above <= 0.0 {
            return 1.0;
        }
        let frac = (above / self.capillary_fringe).min(1.0);
        1.0 - (1.0 - self.residual_saturation) * frac
    }

    /// 某点的强度量
    pub fn intensive_quantities(&self, z: f64, time: f64) -> PointQuantities {
        PointQuantities {
            porosity: self.porosity(z),
            liquid_saturation: Eval::new(self.liquid_saturation(z, time), 1.0),
        }
    }

    /// 按自由度布局构造所有单元上下文
    pub fn elements(&self, grid: &StructuredGrid, mapping: DofMapping, time: f64) -> Vec<ProfileElement> {
        match mapping {
            DofMapping::Vertex => {
                let nodes: Vec<PointQuantities> = (0..grid.n_nodes())
                    .map(|n| self.intensive_quantities(grid.node_position(n)[1], time))
                    .collect();
                (0..grid.n_cells())
                    .map(|c| {
                        let dofs = grid.cell_nodes(c);
                        ProfileElement {
                            iqs: dofs.iter().map(|&n| nodes[n]).collect(),
                            dofs: dofs.into_iter().map(DofIndex::new).collect(),
                        }
                    })
                    .collect()
            }
            DofMapping::Element => (0..grid.n_cells())
                .map(|c| ProfileElement {
                    dofs: vec![DofIndex::new(c)],
                    iqs: vec![self.intensive_quantities(grid.cell_center(c)[1], time)],
                })
                .collect(),
        }
    }
}

// =============================================================================
// 强度量与单元上下文
// =============================================================================

/// 单个自由度上的强度量
#[derive(Debug, Clone, Copy)]
pub struct PointQuantities {
    porosity: f64,
    liquid_saturation: Eval,
}

impl PointQuantities {
    fn saturation(&self, phase: PhaseIndex) -> Eval {
        match phase.get() {
            0 => self.liquid_saturation,
            _ => Eval::from(1.0) - self.liquid_saturation,
        }
    }
}

impl DiffusionIntensiveQuantities for PointQuantities {
    type Evaluation = Eval;

    fn tortuosity(&self, phase: PhaseIndex) -> Eval {
        let saturation = self.saturation(phase);
        // 0^(7/3) 的对偶部在 num-dual 中会得到 NaN
        if saturation.re <= 0.0 {
            return Eval::from(0.0);
        }
        saturation.powf(7.0 / 3.0) * self.porosity.cbrt()
    }

    fn diffusion_coefficient(&self, phase: PhaseIndex, comp: ComponentIndex) -> Eval {
        Eval::from(MOLECULAR_DIFFUSION[phase.get()][comp.get()])
    }

    fn effective_diffusion_coefficient(&self, phase: PhaseIndex, comp: ComponentIndex) -> Eval {
        self.saturation(phase) * self.tortuosity(phase) * self.diffusion_coefficient(phase, comp)
            * self.porosity
    }
}

/// 剖面网格上的单元
#[derive(Debug, Clone)]
pub struct ProfileElement {
    dofs: Vec<DofIndex>,
    iqs: Vec<PointQuantities>,
}

impl ElementContext for ProfileElement {
    type IntensiveQuantities = PointQuantities;

    fn num_primary_dof(&self, _time_idx: usize) -> usize {
        self.dofs.len()
    }

    fn global_space_index(&self, local_dof: usize, _time_idx: usize) -> DofIndex {
        self.dofs[local_dof]
    }

    fn intensive_quantities(&self, local_dof: usize, _time_idx: usize) -> &PointQuantities {
        &self.iqs[local_dof]
    }
}
