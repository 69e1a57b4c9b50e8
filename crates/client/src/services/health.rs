//! 服务健康检查
//!
//! 各服务暴露 `/actuator/health`，返回 `{"status": "UP"}` 即视为健康。

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;

/// 服务健康状态
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceHealth {
    /// 服务健康
    Healthy,
    /// 可达但报告不健康
    Unhealthy(String),
    /// 服务不可达
    Unreachable(String),
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 解析健康检查响应体
    ///
    /// 非 JSON 响应包含 ok/up 即通过；JSON 缺少 status 字段时仅以可达为准。
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(json) => match json.get("status").and_then(Value::as_str) {
                Some(status) if status.eq_ignore_ascii_case("UP") => Self::Healthy,
                Some(status) => Self::Unhealthy(format!("status={}", status)),
                None => Self::Healthy,
            },
            Err(_) => {
                let lower = body.to_lowercase();
                if lower.contains("ok") || lower.contains("up") {
                    Self::Healthy
                } else {
                    Self::Unhealthy(format!("无法识别的响应: {}", body))
                }
            }
        }
    }
}

/// 健康检查客户端
#[derive(Debug, Clone)]
pub struct HealthClient {
    client: Client,
    attempts: u32,
    wait: Duration,
}

impl HealthClient {
    /// 默认每个服务最多检查 5 次，间隔 5 秒
    pub fn new(client: Client) -> Self {
        Self::with_retry(client, 5, Duration::from_secs(5))
    }

    pub fn with_retry(client: Client, attempts: u32, wait: Duration) -> Self {
        Self {
            client,
            attempts: attempts.max(1),
            wait,
        }
    }

    /// 单次检查
    pub async fn check_once(&self, base_url: &str) -> ServiceHealth {
        let url = format!("{}/actuator/health", base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let body = resp.text().await.unwrap_or_default();
                ServiceHealth::from_body(&body)
            }
            Ok(resp) => ServiceHealth::Unhealthy(format!("状态码: {}", resp.status())),
            Err(e) => {
                tracing::debug!("健康检查失败 {}: {}", url, e);
                ServiceHealth::Unreachable(e.to_string())
            }
        }
    }

    /// 带重试的检查，返回最后一次结果
    pub async fn check(&self, base_url: &str) -> ServiceHealth {
        let mut last = ServiceHealth::Unreachable("未检查".to_string());
        for attempt in 0..self.attempts {
            last = self.check_once(base_url).await;
            if last.is_healthy() {
                break;
            }
            if attempt + 1 < self.attempts {
                sleep(self.wait).await;
            }
        }
        last
    }

    /// 并行检查一组服务
    pub async fn check_all(
        &self,
        targets: &[(&'static str, String)],
    ) -> Vec<(&'static str, ServiceHealth)> {
        let checks = targets.iter().map(|(name, url)| async move {
            let health = self.check(url).await;
            (*name, health)
        });
        join_all(checks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_body_parsing() {
        assert_eq!(ServiceHealth::from_body(r#"{"status":"UP"}"#), ServiceHealth::Healthy);
        assert!(matches!(
            ServiceHealth::from_body(r#"{"status":"DOWN"}"#),
            ServiceHealth::Unhealthy(_)
        ));
        assert_eq!(ServiceHealth::from_body(r#"{"components":{}}"#), ServiceHealth::Healthy);
        assert_eq!(ServiceHealth::from_body("OK"), ServiceHealth::Healthy);
        assert!(matches!(ServiceHealth::from_body("<html>"), ServiceHealth::Unhealthy(_)));
    }
}
