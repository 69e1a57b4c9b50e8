//! 共享库
//!
//! 包含一致性测试套件共用的配置、错误处理、重试、轮询、金额与可观测性代码。

pub mod config;
pub mod error;
pub mod money;
pub mod observability;
pub mod poll;
pub mod retry;

pub use error::{ErrorClass, KadoError, Result};
