// apps/mh_cli/src/commands/params.rs

//! 参数列表命令
//!
//! 列出所有注册参数的当前值、默认值和描述。`--json` 输出可直接作为参数文件。

use anyhow::Result;
use clap::Args;

use super::{build_registry, ParamArgs};

/// 参数列表参数
#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    /// 以 JSON 输出当前值
    #[arg(long)]
    pub json: bool,
}

/// 执行参数列表命令
pub fn execute(args: ParamsArgs) -> Result<()> {
    let registry = build_registry(&args.params)?;

    if args.json {
        println!("{}", registry.to_json()?);
        return Ok(());
    }

    println!("=== 参数 ===");
    for spec in registry.specs() {
        let value = registry.get(spec.name)?.to_string();
        let default = spec.default.to_string();
        println!(
            "{:<40} {:<8} (默认 {:<8}) {}",
            spec.name, value, default, spec.description
        );
    }
    Ok(())
}
