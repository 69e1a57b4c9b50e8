//! 统一可观测性模块
//!
//! 套件的 CLI 与端到端测试通过单一入口初始化日志与指标描述。

pub mod metrics;
pub mod tracing;

use ::tracing::debug;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 统一初始化可观测性
///
/// ```ignore
/// use kado_shared::config::ObservabilityConfig;
///
/// kado_shared::observability::init(&ObservabilityConfig::from_env())?;
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;
    metrics::describe();

    debug!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );
    Ok(())
}

/// 测试场景下的初始化，重复调用安全
pub fn init_for_tests() {
    let _ = init(&ObservabilityConfig::from_env());
}
