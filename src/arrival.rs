//! 到达缓冲区
//!
//! 已解析数据包按到达时间排序的惰性序列，到达时间相同时按 appearance_order
//! 决定顺序。输入的 `arrival_time` 通常非递减，但不强制要求——这里用一个
//! 最小堆实现，一次性消费完整批输入后即可按到达顺序弹出，无需预先整体排序。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::packet::{Packet, PacketId};

#[derive(Debug)]
struct Entry {
    arrival_time: u64,
    appearance_order: u64,
    packet_id: PacketId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.arrival_time == other.arrival_time && self.appearance_order == other.appearance_order
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
        // BinaryHeap 是最大堆，反转使堆顶为最早到达的包。
        match self.arrival_time.cmp(&other.arrival_time) {
            Ordering::Equal => self.appearance_order.cmp(&other.appearance_order),
            ord => ord,
        }
        .reverse()
    }
}

/// 到达缓冲区：peek 为 O(1)，pop 为 O(log n)。
#[derive(Debug, Default)]
pub struct ArrivalBuffer {
    heap: BinaryHeap<Entry>,
}

impl ArrivalBuffer {
    /// 从已解析的数据包 arena 构建缓冲区。`packets` 的索引必须等于
    /// 每个包的 `appearance_order`（由解析阶段保证）。
    pub fn from_packets(packets: &[Packet]) -> Self {
        let mut heap = BinaryHeap::with_capacity(packets.len());
        for (idx, pkt) in packets.iter().enumerate() {
            heap.push(Entry {
                arrival_time: pkt.arrival_time,
                appearance_order: pkt.appearance_order,
                packet_id: PacketId(idx),
            });
        }
        Self { heap }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// 下一个到达包的到达时间，不弹出。
    pub fn peek_arrival_time(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.arrival_time)
    }

    pub fn pop(&mut self) -> Option<PacketId> {
        self.heap.pop().map(|e| e.packet_id)
    }
}
