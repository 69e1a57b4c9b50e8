//! Kado24 一致性测试 CLI
//!
//! 加载配置、初始化日志与指标后分发子命令。存在失败场景时以非零码退出。

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use kado_conformance::cli::{Cli, CommandRunner, Commands};
use kado_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("加载配置失败")?;

    // 优先使用环境变量 RUST_LOG，否则使用命令行参数指定的级别
    let mut observability = config.observability.clone();
    observability.log_level = std::env::var("RUST_LOG").unwrap_or(cli.log_level);
    observability.json_logs |= cli.json_logs;
    kado_shared::observability::init(&observability).context("初始化日志失败")?;

    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Run {
            scenarios,
            tags,
            json,
            output,
        } => {
            let suite = runner.run_scenarios(&scenarios, &tags, json, output).await?;
            if !suite.all_passed() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List { tag } => runner.run_list(tag.as_deref())?,
        Commands::Health => runner.run_health().await?,
    }

    Ok(ExitCode::SUCCESS)
}
