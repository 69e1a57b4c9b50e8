//! 最终一致性轮询
//!
//! 钱包发券等异步结果通过固定间隔轮询等待，截止时间基于单调时钟，
//! 到期后返回独立的 [`KadoError::Timeout`]，与普通请求失败区分。

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::PollingConfig;
use crate::error::{KadoError, Result};

/// 轮询策略
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// 截止时间（自首次探测起算）
    pub timeout: Duration,
    /// 两次探测之间的间隔
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_secs(2),
        }
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// 反复探测直到得到结果或超过截止时间
///
/// `check` 返回 `Ok(Some(_))` 表示条件满足，`Ok(None)` 表示继续等待，
/// 返回 `Err` 时立即结束轮询并透传错误。
pub async fn poll_until<F, Fut, T>(policy: &PollPolicy, operation: &str, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let start = Instant::now();
    let deadline = start + policy.timeout;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        metrics::counter!("kado_poll_attempts_total", "operation" => operation.to_string())
            .increment(1);

        if let Some(value) = check().await? {
            debug!(operation, attempts, elapsed_ms = start.elapsed().as_millis() as u64, "轮询条件满足");
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(KadoError::Timeout {
                operation: operation.to_string(),
                waited: now.duration_since(start),
            });
        }

        // 最后一次等待不越过截止时间
        let sleep_for = policy.interval.min(deadline - now);
        tokio::time::sleep(sleep_for).await;
    }
}

/// 等待布尔条件成立
pub async fn wait_until<F, Fut>(policy: &PollPolicy, operation: &str, mut condition: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    poll_until(policy, operation, || {
        let fut = condition();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await
}
