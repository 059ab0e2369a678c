// crates/mh_diagnostics/src/quantity.rs

//! 可选输出量的声明
//!
//! 每个可选量由一个 [`QuantitySpec`] 描述：写出时使用的规范缓冲区名、
//! 控制它的布尔参数、默认值、参数描述，以及缓冲区形状。
//! 扩散模块的三个量见 [`TORTUOSITY`]、[`DIFFUSION_COEFFICIENT`]、
//! [`EFFECTIVE_DIFFUSION_COEFFICIENT`]。

use mh_config::ParamSpec;

/// 缓冲区形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferShape {
    /// 每相一个自由度数组：`[phase][dof]`
    Phase,
    /// 每相每组分一个自由度数组：`[phase][comp][dof]`
    PhaseComponent,
}

/// 可选输出量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySpec {
    /// 规范缓冲区名，提交给写出后端时使用
    pub name: &'static str,
    /// 控制开关的参数名
    pub param: &'static str,
    /// 参数缺失时的默认值
    pub default: bool,
    /// 参数描述
    pub description: &'static str,
    /// 缓冲区形状
    pub shape: BufferShape,
}

impl QuantitySpec {
    /// 对应的参数声明
    pub fn param_spec(&self) -> ParamSpec {
        ParamSpec::bool(self.param, self.default, self.description)
    }
}

/// 各相曲折度
pub const TORTUOSITY: QuantitySpec = QuantitySpec {
    name: "tortuosity",
    param: "VtkWriteTortuosities",
    default: false,
    description: "Include the tortuosity for each phase in the VTK output files",
    shape: BufferShape::Phase,
};

/// 各相各组分分子扩散系数
pub const DIFFUSION_COEFFICIENT: QuantitySpec = QuantitySpec {
    name: "diffusionCoefficient",
    param: "VtkWriteDiffusionCoefficients",
    default: false,
    description: "Include the molecular diffusion coefficients in the VTK output files",
    shape: BufferShape::PhaseComponent,
};

/// 各相各组分有效扩散系数
pub const EFFECTIVE_DIFFUSION_COEFFICIENT: QuantitySpec = QuantitySpec {
    name: "effectiveDiffusionCoefficient",
    param: "VtkWriteEffectiveDiffusionCoefficients",
    default: false,
    description: "Include the effective molecular diffusion coefficients the medium in the VTK output files",
    shape: BufferShape::PhaseComponent,
};
