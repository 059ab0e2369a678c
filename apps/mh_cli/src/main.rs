// apps/mh_cli/src/main.rs

//! MariHydro 命令行界面
//!
//! 诊断输出模块的演示程序：
//!
//! - `run`: 在结构化网格上运行非饱和带地下水扩散示例，按参数选择写出的诊断量
//! - `params`: 列出所有已注册参数及当前值
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**。库代码通过 `log` 门面记录日志，
//! 这里安装的 `tracing` 订阅器同时接收两者。

mod commands;
mod problem;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

/// MariHydro 诊断输出命令行工具
#[derive(Parser)]
#[command(name = "mh_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MariHydro selective diagnostic output demo", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行扩散示例并写出 VTU 序列
    Run(commands::run::RunArgs),
    /// 列出参数
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish()
        .try_init()?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Params(args) => commands::params::execute(args),
    }
}
