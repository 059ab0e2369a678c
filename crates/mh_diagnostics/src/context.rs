// crates/mh_diagnostics/src/context.rs

//! 外部协作者接口
//!
//! 输出模块不拥有网格、离散或材料定律，只通过以下两个 trait 读取：
//!
//! - [`ElementContext`]: 当前单元的局部自由度、全局索引和强度量
//! - [`DiffusionIntensiveQuantities`]: 单个自由度上的扩散相关强度量
//!
//! 强度量可以携带导数（如 `num_dual::Dual64`），
//! 写入缓冲区前通过 [`Materialize`] 去掉导数。

use mh_foundation::{ComponentIndex, DofIndex, PhaseIndex};
use mh_runtime::Materialize;

/// 单元上下文
///
/// 描述一个网格单元的局部视图。多个单元可以共享同一个全局自由度。
pub trait ElementContext {
    /// 单自由度上的强度量
    type IntensiveQuantities;

    /// 本单元的主自由度数
    fn num_primary_dof(&self, time_idx: usize) -> usize;

    /// 局部自由度对应的全局自由度
    fn global_space_index(&self, local_dof: usize, time_idx: usize) -> DofIndex;

    /// 局部自由度上的强度量
    fn intensive_quantities(&self, local_dof: usize, time_idx: usize) -> &Self::IntensiveQuantities;
}

/// 扩散相关的强度量
pub trait DiffusionIntensiveQuantities {
    /// 强度量的数值类型（可带导数）
    type Evaluation: Materialize;

    /// 相曲折度
    fn tortuosity(&self, phase: PhaseIndex) -> Self::Evaluation;

    /// 组分在相中的分子扩散系数
    fn diffusion_coefficient(&self, phase: PhaseIndex, comp: ComponentIndex) -> Self::Evaluation;

    /// 组分在相中、考虑多孔介质后的有效扩散系数
    fn effective_diffusion_coefficient(
        &self,
        phase: PhaseIndex,
        comp: ComponentIndex,
    ) -> Self::Evaluation;
}
