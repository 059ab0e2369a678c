// crates/mh_diagnostics/src/buffer.rs

//! 输出缓冲区
//!
//! 每个可选量一块缓冲区，按全局自由度索引寻址：
//!
//! - [`PhaseBuffer`]: `[phase][dof]`
//! - [`PhaseComponentBuffer`]: `[phase][comp][dof]`
//!
//! [`BufferSet`] 按开关决定哪些缓冲区存在：未启用的量没有任何存储。
//! 每次 [`BufferSet::allocate`] 都把已存在缓冲区清零并调整到新的自由度数，
//! 上一输出周期的值不会残留。

use mh_foundation::{ComponentIndex, DofIndex, PhaseIndex};
use mh_runtime::RuntimeScalar;

use crate::flags::FlagCache;
use crate::module::FluidLayout;
use crate::quantity::BufferShape;

/// 每相一个自由度数组
pub type PhaseBuffer<S> = Vec<Vec<S>>;

/// 每相每组分一个自由度数组
pub type PhaseComponentBuffer<S> = Vec<Vec<Vec<S>>>;

/// 把相缓冲区调整为 `num_phases × num_dof` 并清零
///
/// 保留内层数组已有的容量。
pub fn resize_phase_buffer<S: RuntimeScalar>(
    buffer: &mut PhaseBuffer<S>,
    num_phases: usize,
    num_dof: usize,
) {
    buffer.resize_with(num_phases, Vec::new);
    for values in buffer.iter_mut() {
        values.clear();
        values.resize(num_dof, S::ZERO);
    }
}

/// 把相-组分缓冲区调整为 `num_phases × num_components × num_dof` 并清零
pub fn resize_phase_component_buffer<S: RuntimeScalar>(
    buffer: &mut PhaseComponentBuffer<S>,
    num_phases: usize,
    num_components: usize,
    num_dof: usize,
) {
    buffer.resize_with(num_phases, Vec::new);
    for per_phase in buffer.iter_mut() {
        resize_phase_buffer(per_phase, num_components, num_dof);
    }
}

// =============================================================================
// 单个量的缓冲区
// =============================================================================

/// 单个量的缓冲区
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityBuffer<S> {
    /// `[phase][dof]`
    Phase(PhaseBuffer<S>),
    /// `[phase][comp][dof]`
    PhaseComponent(PhaseComponentBuffer<S>),
}

impl<S: RuntimeScalar> QuantityBuffer<S> {
    /// 按形状创建全零缓冲区
    pub fn zeros(shape: BufferShape, layout: FluidLayout, num_dof: usize) -> Self {
        let mut buffer = match shape {
            BufferShape::Phase => Self::Phase(Vec::new()),
            BufferShape::PhaseComponent => Self::PhaseComponent(Vec::new()),
        };
        buffer.reset(layout, num_dof);
        buffer
    }

    /// 调整尺寸并清零
    pub fn reset(&mut self, layout: FluidLayout, num_dof: usize) {
        match self {
            Self::Phase(buf) => resize_phase_buffer(buf, layout.num_phases, num_dof),
            Self::PhaseComponent(buf) => resize_phase_component_buffer(
                buf,
                layout.num_phases,
                layout.num_components,
                num_dof,
            ),
        }
    }

    /// 形状
    pub fn shape(&self) -> BufferShape {
        match self {
            Self::Phase(_) => BufferShape::Phase,
            Self::PhaseComponent(_) => BufferShape::PhaseComponent,
        }
    }

    /// 每个数组的自由度数
    pub fn num_dof(&self) -> usize {
        match self {
            Self::Phase(buf) => buf.first().map_or(0, Vec::len),
            Self::PhaseComponent(buf) => buf
                .first()
                .and_then(|per_phase| per_phase.first())
                .map_or(0, Vec::len),
        }
    }

    /// 作为相缓冲区访问
    pub fn as_phase(&self) -> Option<&PhaseBuffer<S>> {
        match self {
            Self::Phase(buf) => Some(buf),
            Self::PhaseComponent(_) => None,
        }
    }

    /// 作为相-组分缓冲区访问
    pub fn as_phase_component(&self) -> Option<&PhaseComponentBuffer<S>> {
        match self {
            Self::Phase(_) => None,
            Self::PhaseComponent(buf) => Some(buf),
        }
    }
}

/// 相缓冲区转换为输出精度的副本
pub fn phase_to_output<S: RuntimeScalar>(buffer: &PhaseBuffer<S>) -> Vec<Vec<f64>> {
    buffer
        .iter()
        .map(|values| values.iter().map(|v| v.to_output()).collect())
        .collect()
}

/// 相-组分缓冲区转换为输出精度的副本
pub fn phase_component_to_output<S: RuntimeScalar>(
    buffer: &PhaseComponentBuffer<S>,
) -> Vec<Vec<Vec<f64>>> {
    buffer.iter().map(phase_to_output).collect()
}

// =============================================================================
// 写入
// =============================================================================

/// 一次缓冲区写入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferWrite<S> {
    /// 量在声明列表中的位置
    pub slot: usize,
    /// 相
    pub phase: PhaseIndex,
    /// 组分，相缓冲区为 `None`
    pub comp: Option<ComponentIndex>,
    /// 全局自由度
    pub dof: DofIndex,
    /// 物化后的值
    pub value: S,
}

impl<S> BufferWrite<S> {
    /// 写入相缓冲区
    pub fn phase(slot: usize, phase: PhaseIndex, dof: DofIndex, value: S) -> Self {
        Self {
            slot,
            phase,
            comp: None,
            dof,
            value,
        }
    }

    /// 写入相-组分缓冲区
    pub fn phase_component(
        slot: usize,
        phase: PhaseIndex,
        comp: ComponentIndex,
        dof: DofIndex,
        value: S,
    ) -> Self {
        Self {
            slot,
            phase,
            comp: Some(comp),
            dof,
            value,
        }
    }
}

/// 缓冲区写入的接收方
///
/// 顺序遍历时直接写入 [`BufferSet`]；并行遍历时先收集到 `Vec`，再按单元顺序回放。
pub trait ValueSink<S> {
    /// 接收一次写入
    fn store(&mut self, write: BufferWrite<S>);
}

impl<S> ValueSink<S> for Vec<BufferWrite<S>> {
    #[inline]
    fn store(&mut self, write: BufferWrite<S>) {
        self.push(write);
    }
}

// =============================================================================
// BufferSet
// =============================================================================

/// 一个输出模块的全部缓冲区
#[derive(Debug, Clone)]
pub struct BufferSet<S> {
    slots: Vec<Option<QuantityBuffer<S>>>,
    num_dof: usize,
}

impl<S: RuntimeScalar> BufferSet<S> {
    /// 创建空集合，`len` 为可选量个数
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            num_dof: 0,
        }
    }

    /// 按开关分配缓冲区
    ///
    /// 启用的量得到 `num_phases [× num_components] × num_dof` 的全零缓冲区，
    /// 未启用的量没有缓冲区。
    pub fn allocate(&mut self, flags: &FlagCache, layout: FluidLayout, num_dof: usize) {
        for (slot, spec) in flags.specs().iter().enumerate() {
            if !flags.is_enabled_at(slot) {
                self.slots[slot] = None;
                continue;
            }
            match &mut self.slots[slot] {
                Some(buffer) => buffer.reset(layout, num_dof),
                empty => *empty = Some(QuantityBuffer::zeros(spec.shape, layout, num_dof)),
            }
        }
        self.num_dof = num_dof;
    }

    /// 最近一次分配的自由度数
    pub fn num_dof(&self) -> usize {
        self.num_dof
    }

    /// 可选量个数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 是否没有声明任何可选量
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 某个量的缓冲区
    pub fn get(&self, slot: usize) -> Option<&QuantityBuffer<S>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// 某个量是否有缓冲区
    pub fn is_allocated(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// 按顺序回放一批写入
    pub fn apply<I>(&mut self, writes: I)
    where
        I: IntoIterator<Item = BufferWrite<S>>,
    {
        for write in writes {
            self.store(write);
        }
    }
}

impl<S: RuntimeScalar> ValueSink<S> for BufferSet<S> {
    /// 写入对应缓冲区
    ///
    /// 目标量没有缓冲区时丢弃写入（`alloc_buffers` 尚未调用）。
    ///
    /// # Panics
    ///
    /// 相、组分或自由度索引超出分配尺寸时 panic。
    fn store(&mut self, write: BufferWrite<S>) {
        let dof = write.dof.get();
        match (self.slots.get_mut(write.slot), write.comp) {
            (Some(Some(QuantityBuffer::Phase(buf))), None) => {
                buf[write.phase.get()][dof] = write.value;
            }
            (Some(Some(QuantityBuffer::PhaseComponent(buf))), Some(comp)) => {
                buf[write.phase.get()][comp.get()][dof] = write.value;
            }
            (Some(Some(_)), _) => {
                debug_assert!(false, "缓冲区形状与写入不匹配: slot {}", write.slot);
            }
            _ => {
                log::trace!("slot {} 没有缓冲区，丢弃写入", write.slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mh_foundation::index::{component, dof, phase};

    #[test]
    fn test_resize_phase_buffer_zeroes() {
        let mut buf: PhaseBuffer<f64> = vec![vec![1.0; 2]; 3];
        resize_phase_buffer(&mut buf, 2, 4);
        assert_eq!(buf, vec![vec![0.0; 4]; 2]);
    }

    #[test]
    fn test_resize_phase_component_buffer() {
        let mut buf: PhaseComponentBuffer<f32> = Vec::new();
        resize_phase_component_buffer(&mut buf, 2, 3, 5);
        assert_eq!(buf.len(), 2);
        assert!(buf.iter().all(|p| p.len() == 3));
        assert!(buf.iter().flatten().all(|c| c.len() == 5 && c.iter().all(|v| *v == 0.0)));
    }

    #[test]
    fn test_quantity_buffer_shape() {
        let layout = FluidLayout::new(2, 3);
        let b = QuantityBuffer::<f64>::zeros(BufferShape::PhaseComponent, layout, 7);
        assert_eq!(b.shape(), BufferShape::PhaseComponent);
        assert_eq!(b.num_dof(), 7);
        assert!(b.as_phase().is_none());
        assert_eq!(b.as_phase_component().unwrap()[1].len(), 3);
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut writes = Vec::new();
        writes.store(BufferWrite::phase(0, phase(0), dof(1), 1.0));
        writes.store(BufferWrite::phase_component(1, phase(0), component(1), dof(1), 2.0));
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].comp, Some(component(1)));
    }

    #[test]
    fn test_to_output_conversion() {
        let buf: PhaseBuffer<f32> = vec![vec![0.5, 0.25]];
        assert_eq!(phase_to_output(&buf), vec![vec![0.5, 0.25]]);
    }
}
