// crates/mh_diagnostics/src/flags.rs

//! 输出开关缓存
//!
//! 每个可选量的开关在首次查询时从参数源解析一次，此后在进程生命周期内保持不变，
//! 即使参数源之后被修改。总开关 `EnableVtkOutput` 同样只解析一次。
//!
//! 解析使用 [`OnceLock`]，并发的首次查询只会有一个线程写入结果，
//! 其余线程读到同一个值。
//!
//! 参数源中找不到开关时使用量声明中的默认值并记录警告：
//! 这通常意味着 `register_parameters` 没有被调用。

use std::sync::{Arc, OnceLock};

use mh_config::output::ENABLE_VTK_OUTPUT;
use mh_config::ParamSource;

use crate::quantity::QuantitySpec;

/// 总开关的默认值
const GATE_DEFAULT: bool = true;

/// 开关缓存
pub struct FlagCache {
    source: Arc<dyn ParamSource>,
    specs: &'static [QuantitySpec],
    slots: Vec<OnceLock<bool>>,
    gate: OnceLock<bool>,
}

impl FlagCache {
    /// 为一组可选量创建缓存，开关尚未解析
    pub fn new(specs: &'static [QuantitySpec], source: Arc<dyn ParamSource>) -> Self {
        Self {
            source,
            specs,
            slots: specs.iter().map(|_| OnceLock::new()).collect(),
            gate: OnceLock::new(),
        }
    }

    /// 管理的可选量
    pub fn specs(&self) -> &'static [QuantitySpec] {
        self.specs
    }

    /// 按规范缓冲区名查询开关
    ///
    /// 未声明的名称返回 `false`。
    pub fn is_enabled(&self, name: &str) -> bool {
        self.specs
            .iter()
            .position(|s| s.name == name)
            .map_or(false, |slot| self.is_enabled_at(slot))
    }

    /// 按声明顺序查询开关
    ///
    /// # Panics
    ///
    /// `slot` 超出声明数量时 panic。
    pub fn is_enabled_at(&self, slot: usize) -> bool {
        let spec = &self.specs[slot];
        *self.slots[slot].get_or_init(|| self.resolve(spec.param, spec.default))
    }

    /// 总开关（`EnableVtkOutput`）
    ///
    /// 与各量开关一样，首次查询时从参数源读取并在本实例内冻结。
    /// 之后对参数源的修改不会影响已构造的模块，也就是不会在每个单元上重新读取；
    /// 需要在运行中切换总开关时，应重新构造模块。
    pub fn gate_enabled(&self) -> bool {
        *self
            .gate
            .get_or_init(|| self.resolve(ENABLE_VTK_OUTPUT, GATE_DEFAULT))
    }

    /// 开关是否已经解析
    pub fn is_resolved(&self, slot: usize) -> bool {
        self.slots.get(slot).map_or(false, |s| s.get().is_some())
    }

    fn resolve(&self, param: &str, default: bool) -> bool {
        match self.source.lookup_bool(param) {
            Some(value) => {
                log::debug!("输出开关 {} = {}", param, value);
                value
            }
            None => {
                log::warn!("参数 {} 未注册或不是布尔值，使用默认值 {}", param, default);
                default
            }
        }
    }
}

impl std::fmt::Debug for FlagCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagCache")
            .field("specs", &self.specs.iter().map(|s| s.name).collect::<Vec<_>>())
            .field("slots", &self.slots)
            .field("gate", &self.gate)
            .finish()
    }
}
