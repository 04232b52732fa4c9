//! 数据包类型
//!
//! 定义输入记录及其派生的调度字段。队列只持有 `PacketId` 句柄，数据包本身
//! 由 [`Scheduler`](crate::scheduler::Scheduler) 持有的 arena 单一拥有，
//! 避免在多个堆中反复复制整条记录。

use std::net::Ipv4Addr;

/// Packet 在 arena 中的句柄；等同于其 appearance_order。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketId(pub usize);

/// 4 元组，用于流表查找。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub src_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_ip: Ipv4Addr,
    pub dst_port: u16,
}

/// 一条已解析的输入记录，附带调度所需的派生字段。
///
/// 到达处理时计算出的 `flow_id`、`virtual_start`、`virtual_finish` 只作为
/// 排序键存在于就绪队列与虚拟总线的堆条目中，不在此结构体上保留一份副本。
#[derive(Debug, Clone)]
pub struct Packet {
    pub arrival_time: u64,
    pub length: u64,
    pub flow_key: FlowKey,
    pub explicit_weight: Option<f64>,
    pub appearance_order: u64,
    /// 原始输入行，逐字节在输出中复现。
    pub raw_line: String,
}
