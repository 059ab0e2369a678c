// crates/mh_foundation/src/index.rs

//! 强类型索引
//!
//! 诊断输出层同时处理自由度、流体相、化学组分三类下标，
//! 三者都是 `usize`，混用会静默写错缓冲区。这里为每类下标生成独立的 newtype。
//!
//! 全局自由度索引 [`DofIndex`] 由外部网格枚举设施分配，在整个计算域内唯一，
//! 输出缓冲区按它寻址，而不是按单元内的局部位置。
//!
//! # 示例
//!
//! ```rust
//! use mh_foundation::index::{DofIndex, PhaseIndex, dof, phase};
//!
//! let d = DofIndex::new(0);
//! let p = phase(1);
//!
//! assert!(d.is_valid());
//! assert_eq!(p.get(), 1);
//! assert_eq!(dof(7).get(), 7);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 无效索引标记
pub const INVALID_INDEX: usize = usize::MAX;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $doc:literal) => {
        #[doc = $doc]
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// 无效索引常量
            pub const INVALID: Self = Self(INVALID_INDEX);

            /// 创建新索引
            #[inline]
            pub const fn new(idx: usize) -> Self {
                Self(idx)
            }

            /// 获取索引值
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// 检查是否有效
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != INVALID_INDEX
            }

            /// 检查是否无效
            #[inline]
            pub const fn is_invalid(self) -> bool {
                self.0 == INVALID_INDEX
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(idx: usize) -> Self { Self::new(idx) }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize { idx.get() }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(INVALID)", stringify!($name))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "INVALID")
                }
            }
        }

        impl Default for $name {
            fn default() -> Self { Self::INVALID }
        }
    };
}

define_index!(DofIndex, "全局自由度索引（整个计算域内唯一）");
define_index!(PhaseIndex, "流体相索引");
define_index!(ComponentIndex, "化学组分索引");

/// 创建自由度索引
#[inline]
pub const fn dof(idx: usize) -> DofIndex {
    DofIndex::new(idx)
}

/// 创建相索引
#[inline]
pub const fn phase(idx: usize) -> PhaseIndex {
    PhaseIndex::new(idx)
}

/// 创建组分索引
#[inline]
pub const fn component(idx: usize) -> ComponentIndex {
    ComponentIndex::new(idx)
}
