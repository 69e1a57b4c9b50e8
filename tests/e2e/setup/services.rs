//! 服务健康检查
//!
//! 确保所有依赖服务在测试开始前已就绪。

use std::time::Duration;

use anyhow::{Result, anyhow};
use kado_client::{HealthClient, ServiceHealth};
use kado_shared::config::ServiceEndpoints;
use tokio::time::{Instant, sleep};

/// 服务管理器
pub struct ServiceManager {
    health: HealthClient,
    targets: Vec<(&'static str, String)>,
}

impl ServiceManager {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            // 单次检查，重试由 wait_all_ready 控制
            health: HealthClient::with_retry(client, 1, Duration::ZERO),
            targets: endpoints.health_targets(),
        })
    }

    /// 检查所有服务健康状态
    pub async fn check_all_services(&self) -> Vec<(&'static str, ServiceHealth)> {
        self.health.check_all(&self.targets).await
    }

    /// 等待所有服务就绪
    pub async fn wait_all_ready(&self, timeout: Duration) -> Result<()> {
        let start = Instant::now();

        loop {
            let results = self.check_all_services().await;
            if results.iter().all(|(_, health)| health.is_healthy()) {
                tracing::info!("所有服务已就绪");
                return Ok(());
            }

            if start.elapsed() > timeout {
                let unhealthy: Vec<_> = results
                    .iter()
                    .filter(|(_, h)| !h.is_healthy())
                    .map(|(name, health)| format!("{}: {:?}", name, health))
                    .collect();

                return Err(anyhow!(
                    "等待服务就绪超时，以下服务不健康: {}",
                    unhealthy.join(", ")
                ));
            }

            tracing::debug!("等待服务就绪...");
            sleep(Duration::from_secs(1)).await;
        }
    }
}
