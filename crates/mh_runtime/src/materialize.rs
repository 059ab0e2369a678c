// crates/mh_runtime/src/materialize.rs

//! 物化：把求解器内部的数值表示剥离为普通标量
//!
//! 输出模块从强度量中取到的值可能是普通浮点数，也可能是携带导数的
//! 对偶数（[`num_dual::Dual64`] / [`num_dual::Dual32`]）。写入缓冲区前统一调用
//! [`Materialize::value`]，对偶数只保留实部。
//! 对更一般的数值表示（例如延迟求值的符号表达式），物化可能涉及非平凡的计算，
//! 因此调用方不应假定它是零开销的。

use num_dual::{Dual32, Dual64};

use crate::scalar::RuntimeScalar;

/// 可物化为普通标量的数值表示
pub trait Materialize {
    /// 物化后的标量类型
    type Scalar: RuntimeScalar;

    /// 提取函数值，丢弃导数等附加信息
    fn value(&self) -> Self::Scalar;
}

impl Materialize for f32 {
    type Scalar = f32;

    #[inline]
    fn value(&self) -> f32 {
        *self
    }
}

impl Materialize for f64 {
    type Scalar = f64;

    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl Materialize for Dual32 {
    type Scalar = f32;

    #[inline]
    fn value(&self) -> f32 {
        self.re
    }
}

impl Materialize for Dual64 {
    type Scalar = f64;

    #[inline]
    fn value(&self) -> f64 {
        self.re
    }
}

/// 自由函数形式，便于在闭包和迭代器中使用
#[inline]
pub fn materialize<M: Materialize>(v: &M) -> M::Scalar {
    v.value()
}
