//! 事件循环
//!
//! 调度器把流表、到达缓冲区、就绪队列与虚拟总线捆绑成单一拥有者，不留
//! 任何进程级全局状态。每次迭代依次执行：推进虚拟时间 → 虚拟离开 →
//! 真实离开 → 到达 → 派发。

use std::io::Write;

use tracing::{debug, info, trace};

use crate::arrival::ArrivalBuffer;
use crate::error::SchedulerError;
use crate::flow::FlowTable;
use crate::io::format_dispatch_line;
use crate::order::EPSILON;
use crate::packet::{Packet, PacketId};
use crate::ready_queue::ReadyQueue;
use crate::virtual_bus::VirtualBus;

/// 默认流表容量上限。
pub const DEFAULT_MAX_FLOWS: usize = 10_000;

/// 调度器：持有全部核心状态，驱动单一事件循环。
pub struct Scheduler {
    packets: Vec<Packet>,
    flows: FlowTable,
    arrivals: ArrivalBuffer,
    ready: ReadyQueue,
    virtual_bus: VirtualBus,

    /// 当前虚拟时间 V。
    v: f64,
    /// V 最近一次被重新计算时对应的真实时间。
    last_v_update: f64,
    /// 服务器下次空闲的真实时间。
    next_free_time: u64,
    link_busy: bool,

    dispatched: u64,
}

/// 一次完成的调度运行的汇总统计。
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub packets_dispatched: u64,
    pub flows_created: usize,
    pub final_virtual_time: f64,
}

impl Scheduler {
    /// 用已解析的数据包构建调度器。`packets` 的下标必须等于每个包的
    /// `appearance_order`（[`crate::io::parse_all`] 保证这一点）。
    pub fn new(packets: Vec<Packet>, max_flows: usize) -> Self {
        let arrivals = ArrivalBuffer::from_packets(&packets);
        Self {
            packets,
            flows: FlowTable::new(max_flows),
            arrivals,
            ready: ReadyQueue::new(),
            virtual_bus: VirtualBus::new(),
            v: 0.0,
            last_v_update: 0.0,
            next_free_time: 0,
            link_busy: false,
            dispatched: 0,
        }
    }

    /// 运行事件循环直到到达缓冲区与就绪队列都耗尽，把每次派发写入 `out`。
    #[tracing::instrument(skip(self, out))]
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<RunSummary, SchedulerError> {
        info!(packets = self.packets.len(), "开始运行 WFQ 调度");

        while !self.arrivals.is_empty() || !self.ready.is_empty() {
            self.step(out)?;
        }

        let summary = RunSummary {
            packets_dispatched: self.dispatched,
            flows_created: self.flows.len(),
            final_virtual_time: self.v,
        };
        info!(
            dispatched = summary.packets_dispatched,
            flows = summary.flows_created,
            final_v = summary.final_virtual_time,
            "调度完成"
        );
        Ok(summary)
    }

    /// 当前虚拟时间，供测试验证 V 单调不减。
    pub(crate) fn current_virtual_time(&self) -> f64 {
        self.v
    }

    pub(crate) fn has_pending_work(&self) -> bool {
        !self.arrivals.is_empty() || !self.ready.is_empty()
    }

    /// 单步推进事件循环。除 `run` 外仅测试代码（不变量检查）直接调用。
    pub(crate) fn step<W: Write>(&mut self, out: &mut W) -> Result<(), SchedulerError> {
        // (a) 下一事件时间。
        let t_arrival = self
            .arrivals
            .peek_arrival_time()
            .map(|a| a as f64)
            .unwrap_or(f64::INFINITY);
        let t_departure = if self.link_busy {
            self.next_free_time as f64
        } else {
            f64::INFINITY
        };
        let t_virt = match self.virtual_bus.peek_min() {
            Some((min_vf, _)) => {
                let sw = self.virtual_bus.sum_active_weight();
                if sw <= 0.0 {
                    return Err(SchedulerError::InvalidState(
                        "sum_active_weight <= 0 while virtual bus is non-empty".into(),
                    ));
                }
                self.last_v_update + (min_vf - self.v) * sw
            }
            None => f64::INFINITY,
        };

        let t_next = t_arrival.min(t_departure).min(t_virt);
        trace!(t_arrival, t_departure, t_virt, t_next, v = self.v, "下一事件");

        // (b) 推进虚拟时间。
        let sw_before = self.virtual_bus.sum_active_weight();
        if sw_before > 0.0 {
            self.v += (t_next - self.last_v_update) / sw_before;
        }
        self.last_v_update = t_next;

        // (c) 虚拟离开：本轮内所有在容差内到期的条目一次性处理完。
        if (t_next - t_virt).abs() <= EPSILON {
            while let Some((min_vf, _)) = self.virtual_bus.peek_min() {
                if min_vf > self.v + EPSILON {
                    break;
                }
                self.virtual_bus.pop_min();
            }
            if self.virtual_bus.sum_active_weight() < -EPSILON {
                return Err(SchedulerError::InvalidState(
                    "sum_active_weight went negative after virtual departure".into(),
                ));
            }
            debug!(v = self.v, "虚拟离开处理完毕");
        }

        // (d) 真实离开。
        if self.link_busy && (t_next - self.next_free_time as f64).abs() <= EPSILON {
            self.link_busy = false;
            debug!(t = t_next, "链路转为空闲");
        }

        // (e) 处理所有到达时间 <= t_next 的包，按 appearance_order 顺序。
        while let Some(arrival_time) = self.arrivals.peek_arrival_time() {
            if arrival_time as f64 > t_next + EPSILON {
                break;
            }
            let packet_id = self.arrivals.pop().expect("peeked non-empty");
            self.admit(packet_id)?;
        }

        // (f) 派发。
        if !self.link_busy {
            if let Some(packet_id) = self.ready.pop_min() {
                self.dispatch(packet_id, t_next, out)?;
            }
        }

        Ok(())
    }

    /// 处理单个到达事件：流表查找/权重更新、虚拟完成时间计算、双重入队。
    fn admit(&mut self, packet_id: PacketId) -> Result<(), SchedulerError> {
        let key = self.packets[packet_id.0].flow_key;
        let appearance_order = self.packets[packet_id.0].appearance_order;
        let flow_id = self.flows.find_or_create(key, appearance_order)?;

        if let Some(w) = self.packets[packet_id.0].explicit_weight {
            self.flows.get_mut(flow_id).weight = w;
        }

        let weight = self.flows.get(flow_id).weight;
        let length = self.packets[packet_id.0].length as f64;
        let last_vf = self.flows.get(flow_id).last_virtual_finish;

        let virtual_start = self.v.max(last_vf);
        let virtual_finish = virtual_start + length / weight;
        self.flows.get_mut(flow_id).last_virtual_finish = virtual_finish;

        trace!(
            ?packet_id,
            flow_id = flow_id.0,
            virtual_start,
            virtual_finish,
            "到达处理完毕"
        );

        self.ready.push(virtual_finish, appearance_order, packet_id);
        self.virtual_bus
            .push(virtual_finish, appearance_order, packet_id, weight);
        Ok(())
    }

    /// 从就绪队列派发一个包：写输出行、占用链路、推进服务器时钟。
    fn dispatch<W: Write>(
        &mut self,
        packet_id: PacketId,
        t: f64,
        out: &mut W,
    ) -> Result<(), SchedulerError> {
        let pkt = &self.packets[packet_id.0];
        let real_start_time = t.round() as u64;

        writeln!(out, "{}", format_dispatch_line(real_start_time, &pkt.raw_line))?;

        self.link_busy = true;
        self.next_free_time = real_start_time + pkt.length;
        self.dispatched += 1;

        debug!(
            ?packet_id,
            real_start_time,
            next_free_time = self.next_free_time,
            "派发"
        );
        Ok(())
    }
}
