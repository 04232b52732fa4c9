//! 虚拟总线
//!
//! GPS 参考系统中当前"在途"的数据包集合，按 `(virtual_finish,
//! appearance_order)` 升序排列。每次 `push` 把该包锁定的流权重计入
//! `sum_active_weight`；每次 `pop_min` 减去的是入队时锁定的权重，而非流的
//! 当前权重，这样后续到达的显式权重变更不会倒算已入队的记账。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::order::FinishKey;
use crate::packet::PacketId;

#[derive(Debug)]
struct Entry {
    key: FinishKey,
    packet_id: PacketId,
    /// 入队时锁定的权重，出队时据此扣减 `sum_active_weight`。
    locked_weight: f64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap 是最大堆；反转使堆顶是最小 virtual_finish。
        self.key.cmp(&other.key).reverse()
    }
}

/// 虚拟总线：有序集合 + backlogged 流权重之和。
#[derive(Debug, Default)]
pub struct VirtualBus {
    heap: BinaryHeap<Entry>,
    sum_active_weight: f64,
}

impl VirtualBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn sum_active_weight(&self) -> f64 {
        self.sum_active_weight
    }

    pub fn push(&mut self, virtual_finish: f64, appearance_order: u64, packet_id: PacketId, weight: f64) {
        self.heap.push(Entry {
            key: FinishKey::new(virtual_finish, appearance_order),
            packet_id,
            locked_weight: weight,
        });
        self.sum_active_weight += weight;
    }

    /// 最小 `virtual_finish` 对应的数据包，不移除。
    pub fn peek_min(&self) -> Option<(f64, PacketId)> {
        self.heap.peek().map(|e| (e.key.virtual_finish, e.packet_id))
    }

    /// 弹出最小项并扣减其锁定权重。
    pub fn pop_min(&mut self) -> Option<PacketId> {
        let entry = self.heap.pop()?;
        self.sum_active_weight -= entry.locked_weight;
        if self.sum_active_weight < 0.0 && self.sum_active_weight > -crate::order::EPSILON {
            self.sum_active_weight = 0.0;
        }
        Some(entry.packet_id)
    }
}
