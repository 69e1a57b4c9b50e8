//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑。

use std::fs;

use anyhow::{Context, Result, bail};
use kado_client::HealthClient;
use kado_client::http::build_client;
use kado_shared::config::AppConfig;
use tracing::{error, info, warn};

use crate::context::FlowContext;
use crate::report::SuiteResults;
use crate::runner::ScenarioRunner;
use crate::scenarios::{self, Scenario};

/// 命令执行器
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 执行 run 命令
    ///
    /// 返回汇总结果，调用方根据 [`SuiteResults::all_passed`] 决定退出码。
    pub async fn run_scenarios(
        &self,
        ids: &[String],
        tags: &[String],
        json: bool,
        output: Option<String>,
    ) -> Result<SuiteResults> {
        for id in ids {
            if scenarios::find(id).is_none() {
                bail!("未找到场景 '{}'\n使用 'list' 查看所有可用场景", id);
            }
        }
        let selected = scenarios::select(ids, tags);
        if selected.is_empty() {
            bail!("筛选条件没有匹配任何场景: ids={:?} tags={:?}", ids, tags);
        }

        info!(
            environment = %self.config.environment,
            scenarios = selected.len(),
            "开始执行一致性场景"
        );
        let ctx = FlowContext::new(self.config.clone()).context("初始化平台客户端失败")?;
        let suite = ScenarioRunner::new(&ctx).run_all(&selected).await;

        let report = serde_json::to_string_pretty(&suite).context("序列化报告失败")?;
        if json {
            println!("{}", report);
        } else {
            println!("\n{}", suite.render_text());
        }
        if let Some(path) = output {
            fs::write(&path, &report).with_context(|| format!("写入报告失败: {}", path))?;
            info!(path = %path, "报告已写入");
        }

        if !suite.all_passed() {
            for failure in suite.failures() {
                error!(
                    scenario = %failure.scenario_id,
                    error = failure.error.as_deref().unwrap_or_default(),
                    "场景失败"
                );
            }
        }
        Ok(suite)
    }

    /// 执行 list 命令
    pub fn run_list(&self, tag: Option<&str>) -> Result<()> {
        let tags: Vec<String> = tag.map(str::to_string).into_iter().collect();
        let selected = scenarios::select(&[], &tags);

        println!("\n已注册的场景:");
        println!("{}", "-".repeat(72));
        for scenario in &selected {
            println!("{}", describe(scenario.as_ref()));
        }
        println!("{}", "-".repeat(72));
        println!("共 {} 个场景", selected.len());
        Ok(())
    }

    /// 执行 health 命令
    pub async fn run_health(&self) -> Result<()> {
        let client = build_client(&self.config.http).context("创建 HTTP 客户端失败")?;
        let health = HealthClient::new(client);
        let targets = self.config.endpoints.health_targets();

        let mut unhealthy = 0;
        for (service, status) in health.check_all(&targets).await {
            if status.is_healthy() {
                println!("  ✓ {:<24} UP", service);
            } else {
                unhealthy += 1;
                warn!(service, ?status, "服务不健康");
                println!("  ✗ {:<24} {:?}", service, status);
            }
        }

        if unhealthy > 0 {
            bail!("{}/{} 个服务不健康", unhealthy, targets.len());
        }
        info!(services = targets.len(), "全部服务健康");
        Ok(())
    }
}

fn describe(scenario: &dyn Scenario) -> String {
    format!(
        "  {:<16} {:<52} [{}]",
        scenario.id(),
        scenario.title(),
        scenario.tags().join(", ")
    )
}
