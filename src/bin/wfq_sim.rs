//! WFQ 批处理仿真入口
//!
//! 从文件或 stdin 读取数据包到达记录，运行加权公平排队调度，把每个包
//! 的真实发送开始时间写到文件或 stdout。

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use wfq_sim::scheduler::{Scheduler, DEFAULT_MAX_FLOWS};

#[derive(Debug, Parser)]
#[command(name = "wfq-sim", about = "加权公平排队（WFQ）批处理调度仿真器")]
struct Args {
    /// 输入轨迹文件路径；省略则从 stdin 读取
    #[arg(long)]
    input: Option<PathBuf>,

    /// 输出文件路径；省略则写到 stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// 流表容量上限（默认 10000，见资源上限）
    #[arg(long, default_value_t = DEFAULT_MAX_FLOWS)]
    max_flows: usize,
}

fn open_input(path: &Option<PathBuf>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(p) => Ok(Box::new(BufReader::new(File::open(p)?))),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(path: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run(args: Args) -> Result<(), wfq_sim::SchedulerError> {
    let reader = open_input(&args.input)?;
    let mut writer = open_output(&args.output)?;

    let packets = wfq_sim::io::parse_all(reader)?;
    info!(packets = packets.len(), "输入解析完成");

    let scheduler = Scheduler::new(packets, args.max_flows);
    let summary = scheduler.run(&mut writer)?;
    writer.flush()?;

    info!(
        dispatched = summary.packets_dispatched,
        flows = summary.flows_created,
        "运行结束"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wfq-sim: {e}");
            ExitCode::FAILURE
        }
    }
}
