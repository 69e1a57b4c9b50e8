//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `run` - 执行一致性场景（可按 ID 或标签筛选）
//! - `list` - 列出已注册的场景
//! - `health` - 检查各服务健康状态
//!
//! # 使用示例
//!
//! ```bash
//! # 执行全部场景
//! kado-conformance run
//!
//! # 只执行并发相关场景，输出 JSON 报告
//! kado-conformance run --tag concurrency --json -o report.json
//!
//! # 执行单个场景
//! kado-conformance run -s CP-N03
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
