//! 输入/输出边界
//!
//! 行格式解析与输出格式化。核心调度器只消费 [`Packet`] 值，不关心它们
//! 从哪里来、往哪里去。

use std::io::BufRead;
use std::net::Ipv4Addr;

use crate::error::SchedulerError;
use crate::packet::{FlowKey, Packet};

const MAX_LINE_BYTES: usize = 255;

fn malformed(line_no: u64, raw: &str, reason: impl Into<String>) -> SchedulerError {
    SchedulerError::MalformedInput {
        line_no,
        reason: reason.into(),
        raw: raw.to_string(),
    }
}

/// 解析整段输入为数据包 arena，按出现顺序编号。
///
/// 空行跳过；超过 255 字节的行拒绝；字段数量或类型不对同样致命。
/// 返回的 `Vec` 下标即每个包的
/// `appearance_order`，供 [`crate::arrival::ArrivalBuffer`] 与
/// [`crate::scheduler::Scheduler`] 直接用作句柄。
pub fn parse_all<R: BufRead>(reader: R) -> Result<Vec<Packet>, SchedulerError> {
    let mut packets = Vec::new();
    let mut appearance_order: u64 = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let raw = line?;

        if raw.len() > MAX_LINE_BYTES {
            return Err(malformed(
                line_no,
                &raw,
                format!("line exceeds {MAX_LINE_BYTES} bytes"),
            ));
        }

        if raw.trim().is_empty() {
            continue;
        }

        let pkt = parse_line(&raw, appearance_order, line_no)?;
        packets.push(pkt);
        appearance_order += 1;
    }

    Ok(packets)
}

fn parse_line(raw: &str, appearance_order: u64, line_no: u64) -> Result<Packet, SchedulerError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.len() != 6 && fields.len() != 7 {
        return Err(malformed(
            line_no,
            raw,
            format!("expected 6 or 7 whitespace-separated fields, got {}", fields.len()),
        ));
    }

    let arrival_time: u64 = fields[0]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("arrival_time: {e}")))?;
    let src_ip: Ipv4Addr = fields[1]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("src_ip: {e}")))?;
    let src_port: u16 = fields[2]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("src_port: {e}")))?;
    let dst_ip: Ipv4Addr = fields[3]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("dst_ip: {e}")))?;
    let dst_port: u16 = fields[4]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("dst_port: {e}")))?;
    let length: u64 = fields[5]
        .parse()
        .map_err(|e| malformed(line_no, raw, format!("length: {e}")))?;
    if length == 0 {
        return Err(malformed(line_no, raw, "length must be positive"));
    }

    let explicit_weight = if fields.len() == 7 {
        let w: f64 = fields[6]
            .parse()
            .map_err(|e| malformed(line_no, raw, format!("weight: {e}")))?;
        if !(w > 0.0) {
            return Err(malformed(line_no, raw, "weight must be positive"));
        }
        Some(w)
    } else {
        None
    };

    Ok(Packet {
        arrival_time,
        length,
        flow_key: FlowKey {
            src_ip,
            src_port,
            dst_ip,
            dst_port,
        },
        explicit_weight,
        appearance_order,
        raw_line: raw.to_string(),
    })
}

/// 格式化一条调度结果：`<real_start_time>: <raw_input_line>`。
pub fn format_dispatch_line(real_start_time: u64, raw_line: &str) -> String {
    format!("{real_start_time}: {raw_line}")
}
