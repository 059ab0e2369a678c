// apps/mh_cli/src/commands/mod.rs

//! 子命令

pub mod params;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use mh_config::ParameterRegistry;
use mh_diagnostics::VtkDiffusionModule;

/// 参数来源（各子命令共用）
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// 参数文件（JSON 扁平对象，如 {"VtkWriteTortuosities": true}）
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// 覆盖单个参数，可重复：--param VtkWriteTortuosities=true
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,
}

/// 注册全部参数，依次应用参数文件和命令行覆盖
pub fn build_registry(args: &ParamArgs) -> Result<Arc<ParameterRegistry>> {
    let registry = ParameterRegistry::new();
    VtkDiffusionModule::<f64>::register_parameters(&registry)?;
    registry.end_registration();

    if let Some(path) = &args.params {
        registry
            .load_json_file(path)
            .with_context(|| format!("读取参数文件 {} 失败", path.display()))?;
    }
    registry
        .apply_overrides(&args.overrides)
        .context("命令行参数覆盖无效")?;
    Ok(Arc::new(registry))
}
