//! CLI 命令定义

use clap::{Parser, Subcommand};

/// Kado24 平台一致性测试工具
///
/// 对运行中的平台执行端到端场景并输出报告。
#[derive(Parser, Debug)]
#[command(name = "kado-conformance")]
#[command(version, about = "Kado24 平台端到端一致性测试")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 执行一致性场景
    ///
    /// 不指定 `--scenario` 与 `--tag` 时执行全部场景。
    Run {
        /// 场景 ID，可重复
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,

        /// 场景标签，可重复
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// 以 JSON 输出报告
        #[arg(long)]
        json: bool,

        /// 报告输出文件（JSON 格式）
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 列出已注册的场景
    List {
        /// 只列出带该标签的场景
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// 检查各服务 /actuator/health
    Health,
}

// ============================================================================
// 单元测试
// ============================================================================
