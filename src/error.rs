//! 错误类型
//!
//! 调度器的错误分类：所有错误都是致命的，没有逐条恢复。

use thiserror::Error;

/// 调度器致命错误。
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("malformed input at line {line_no}: {reason} (raw: {raw:?})")]
    MalformedInput {
        line_no: u64,
        reason: String,
        raw: String,
    },

    #[error("too many flows: attempted to create flow {attempted}, limit is {limit}")]
    TooManyFlows { attempted: usize, limit: usize },

    #[error("io error reading input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scheduler state: {0}")]
    InvalidState(String),
}
