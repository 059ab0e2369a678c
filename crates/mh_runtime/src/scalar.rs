// crates/mh_runtime/src/scalar.rs

//! RuntimeScalar - 普通浮点标量契约
//!
//! 诊断缓冲区存储的是"物化"之后的普通标量，而不是求解器内部的可微分值。
//! 本 trait 描述这类标量需要满足的算术契约：
//!
//! - 全序比较（NaN 除外）
//! - IEEE-754 风格的特殊值（无穷、NaN）
//! - 标准一元/二元数学函数（通过 `num_traits::Float`）
//!
//! `f32` 与 `f64` 直接实现；扩展精度类型只要满足上述契约即可自行实现，
//! 因此本 trait 不做密封。
//!
//! # 示例
//!
//! ```rust
//! use mh_runtime::RuntimeScalar;
//!
//! fn effective<S: RuntimeScalar>(phi: S, sat: S, d: S) -> S {
//!     phi * sat * d
//! }
//!
//! assert_eq!(effective(0.5f64, 0.5, 4.0), 1.0);
//! assert_eq!(f32::from_config(0.25).to_output(), 0.25);
//! ```

use std::fmt::{Debug, Display};
use std::iter::Sum;

use bytemuck::Pod;
use num_traits::{Float, FromPrimitive, NumAssign};

/// 普通浮点标量
///
/// 输出缓冲区的元素类型，也是 [`crate::Materialize::Scalar`] 的取值范围。
pub trait RuntimeScalar:
    Pod + Float + FromPrimitive + NumAssign + Debug + Display + Default + Send + Sync + Sum + 'static
{
    /// 零值，缓冲区重新分配时的填充值
    const ZERO: Self;

    /// 从配置层（全 f64）转换
    ///
    /// 超出目标类型表示范围时饱和为无穷。
    #[inline]
    fn from_config(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(|| {
            if value.is_sign_negative() {
                Self::neg_infinity()
            } else {
                Self::infinity()
            }
        })
    }

    /// 转换为写出格式使用的 f64
    #[inline]
    fn to_output(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RuntimeScalar for f32 {
    const ZERO: f32 = 0.0;
}

impl RuntimeScalar for f64 {
    const ZERO: f64 = 0.0;
}
