//! 测试环境管理
//!
//! 统一加载配置、检查服务健康并构建场景上下文。

use std::time::Duration;

use anyhow::{Context, Result};
use kado_conformance::report::{ConformanceResult, ScenarioOutcome};
use kado_conformance::runner::ScenarioRunner;
use kado_conformance::scenarios;
use kado_conformance::FlowContext;
use kado_shared::config::AppConfig;

use super::ServiceManager;

/// 测试环境配置
#[derive(Debug, Clone)]
pub struct TestEnvConfig {
    /// 等待服务就绪的超时时间
    pub service_ready_timeout: Duration,
    /// 是否跳过服务健康检查
    pub skip_health_check: bool,
}

impl Default for TestEnvConfig {
    fn default() -> Self {
        Self {
            service_ready_timeout: Duration::from_secs(30),
            skip_health_check: std::env::var("SKIP_HEALTH_CHECK")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// 测试环境
pub struct TestEnvironment {
    pub config: TestEnvConfig,
    /// 场景上下文（平台客户端与配置）
    pub ctx: FlowContext,
    pub services: ServiceManager,
}

impl TestEnvironment {
    /// 创建并初始化测试环境
    pub async fn setup() -> Result<Self> {
        Self::setup_with_config(TestEnvConfig::default()).await
    }

    /// 使用自定义配置创建测试环境
    pub async fn setup_with_config(config: TestEnvConfig) -> Result<Self> {
        kado_shared::observability::init_for_tests();
        tracing::info!("初始化测试环境...");

        let app = AppConfig::load().context("加载配置失败")?;
        let services = ServiceManager::new(&app.endpoints)?;

        if config.skip_health_check {
            tracing::warn!("跳过服务健康检查");
        } else {
            services
                .wait_all_ready(config.service_ready_timeout)
                .await?;
        }

        let ctx = FlowContext::new(app).context("创建平台客户端失败")?;
        tracing::info!("测试环境初始化完成");
        Ok(Self {
            config,
            ctx,
            services,
        })
    }

    /// 按 ID 执行一个已注册场景
    pub async fn run_scenario(&self, id: &str) -> Result<ConformanceResult> {
        let scenario = scenarios::find(id).with_context(|| format!("未注册的场景 {}", id))?;
        Ok(ScenarioRunner::new(&self.ctx).run_one(scenario.as_ref()).await)
    }

    /// 执行场景并要求其没有失败
    ///
    /// 跳过与预期失败（钱包、结算等可选服务不可用）不视为失败。
    pub async fn expect_scenario(&self, id: &str) -> Result<ConformanceResult> {
        let result = self.run_scenario(id).await?;
        anyhow::ensure!(
            result.outcome != ScenarioOutcome::Failed,
            "场景 {} 失败: {}",
            id,
            result.error.as_deref().unwrap_or("无错误信息")
        );
        Ok(result)
    }
}
