//! 流表
//!
//! 将 4 元组映射到稳定的流标识符，持有每条流的权重与最近一次虚拟完成时间。

use std::collections::HashMap;

use crate::error::SchedulerError;
use crate::packet::FlowKey;

/// 流标识符：创建顺序即索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlowId(pub usize);

/// 单条流的状态。
#[derive(Debug, Clone)]
pub struct Flow {
    pub id: FlowId,
    pub weight: f64,
    pub last_virtual_finish: f64,
    pub first_seen_order: u64,
}

/// 4 元组 -> FlowId 的查找表，外加按 id 索引的流状态。
#[derive(Debug, Default)]
pub struct FlowTable {
    by_key: HashMap<FlowKey, FlowId>,
    flows: Vec<Flow>,
    max_flows: usize,
}

impl FlowTable {
    pub fn new(max_flows: usize) -> Self {
        Self {
            by_key: HashMap::new(),
            flows: Vec::new(),
            max_flows,
        }
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// 查找或创建流。首次出现时权重默认为 1，`last_virtual_finish` 为 0，
    /// `first_seen_order` 锁定为首包的 appearance_order，之后永不覆盖。
    pub fn find_or_create(
        &mut self,
        key: FlowKey,
        appearance_order: u64,
    ) -> Result<FlowId, SchedulerError> {
        if let Some(&id) = self.by_key.get(&key) {
            return Ok(id);
        }

        if self.flows.len() >= self.max_flows {
            return Err(SchedulerError::TooManyFlows {
                attempted: self.flows.len() + 1,
                limit: self.max_flows,
            });
        }

        let id = FlowId(self.flows.len());
        self.flows.push(Flow {
            id,
            weight: 1.0,
            last_virtual_finish: 0.0,
            first_seen_order: appearance_order,
        });
        self.by_key.insert(key, id);
        Ok(id)
    }

    pub fn get(&self, id: FlowId) -> &Flow {
        &self.flows[id.0]
    }

    pub fn get_mut(&mut self, id: FlowId) -> &mut Flow {
        &mut self.flows[id.0]
    }
}
