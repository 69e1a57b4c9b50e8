//! 测试环境设置模块
//!
//! 提供测试环境的初始化与服务健康检查。

mod environment;
mod services;

pub use environment::{TestEnvConfig, TestEnvironment};
pub use services::ServiceManager;
