//! 就绪队列
//!
//! 等待在真实链路上发送的数据包集合，排序规则与虚拟总线相同：
//! `(virtual_finish, appearance_order)` 升序。任一时刻，就绪队列的成员
//! 总是大于等于虚拟总线的成员（一个包可能已在虚拟系统中完成，但仍在
//! 排队等待真实链路的发送机会）。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::order::FinishKey;
use crate::packet::PacketId;

#[derive(Debug)]
struct Entry {
    key: FinishKey,
    packet_id: PacketId,
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

/// 就绪队列：按虚拟完成时间排序的发送候选集合。
#[derive(Debug, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<Entry>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, virtual_finish: f64, appearance_order: u64, packet_id: PacketId) {
        self.heap.push(Entry {
            key: FinishKey::new(virtual_finish, appearance_order),
            packet_id,
        });
    }

    pub fn pop_min(&mut self) -> Option<PacketId> {
        self.heap.pop().map(|e| e.packet_id)
    }
}
