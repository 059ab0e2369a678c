// crates/mh_foundation/src/lib.rs

//! MariHydro Foundation Layer
//!
//! 基础层，提供诊断输出子系统共用的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `MhError`
//! - [`index`]: 强类型索引（自由度、相、组分）
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **类型安全**: 编译期防止相索引与组分索引混用
//!
//! # 示例
//!
//! ```
//! use mh_foundation::index::{DofIndex, PhaseIndex};
//! use mh_foundation::error::{MhError, MhResult};
//!
//! let dof = DofIndex::new(3);
//! let phase = PhaseIndex::new(0);
//! assert_eq!(dof.get(), 3);
//! assert!(phase.is_valid());
//!
//! fn check(n: usize) -> MhResult<()> {
//!     if n == 0 {
//!         return Err(MhError::invalid_input("自由度数为零"));
//!     }
//!     Ok(())
//! }
//! assert!(check(0).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;

// 重导出常用类型
pub use error::{MhError, MhResult};
pub use index::{ComponentIndex, DofIndex, PhaseIndex, INVALID_INDEX};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{MhError, MhResult};
    pub use crate::index::{ComponentIndex, DofIndex, PhaseIndex};
}
