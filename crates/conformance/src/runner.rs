//! 场景执行器
//!
//! 按顺序执行选中的场景，把场景体的返回值或错误分类归并为 [`ScenarioOutcome`]。
//! 单个场景失败不会中断整轮运行。

use std::time::Instant;

use kado_shared::observability::metrics::record_scenario;
use kado_shared::{ErrorClass, KadoError, Result};
use tracing::{error, info, instrument, warn};

use crate::context::FlowContext;
use crate::report::{ConformanceResult, ScenarioOutcome, SuiteResults, Verdict};
use crate::scenarios::Scenario;

/// 报告名称
pub const SUITE_NAME: &str = "kado24-conformance";

/// 场景体返回值到报告结论的映射
///
/// 基础设施不可用计为预期失败，瞬时故障重试耗尽计为跳过，其余错误一律失败。
pub fn classify(result: Result<Verdict>) -> (ScenarioOutcome, Option<String>, Vec<String>) {
    match result {
        Ok(Verdict::Passed(notes)) => (ScenarioOutcome::Passed, None, notes),
        Ok(Verdict::Skipped(reason)) => (ScenarioOutcome::Skipped, Some(reason), Vec::new()),
        Err(err) => {
            let outcome = match err.class() {
                ErrorClass::Unavailable => ScenarioOutcome::ExpectedFailure,
                ErrorClass::Transient => ScenarioOutcome::Skipped,
                _ => ScenarioOutcome::Failed,
            };
            (outcome, Some(describe(&err)), Vec::new())
        }
    }
}

fn describe(err: &KadoError) -> String {
    format!("[{}] {}", err.code(), err)
}

/// 场景执行器
pub struct ScenarioRunner<'a> {
    ctx: &'a FlowContext,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(ctx: &'a FlowContext) -> Self {
        Self { ctx }
    }

    /// 执行单个场景
    #[instrument(skip(self, scenario), fields(scenario = scenario.id()))]
    pub async fn run_one(&self, scenario: &dyn Scenario) -> ConformanceResult {
        let start = Instant::now();
        info!(title = scenario.title(), "开始执行场景");

        let (outcome, error, notes) = classify(scenario.run(self.ctx).await);
        let elapsed = start.elapsed();
        record_scenario(scenario.id(), outcome.as_str(), elapsed.as_secs_f64());

        let duration_ms = elapsed.as_millis() as u64;
        match outcome {
            ScenarioOutcome::Failed => {
                error!(duration_ms, error = ?error, "场景失败");
            }
            ScenarioOutcome::Skipped | ScenarioOutcome::ExpectedFailure => {
                warn!(outcome = outcome.as_str(), duration_ms, reason = ?error, "场景未完成");
            }
            ScenarioOutcome::Passed => info!(duration_ms, "场景通过"),
        }

        let mut result =
            ConformanceResult::new(scenario.id(), scenario.title(), outcome, duration_ms)
                .with_notes(notes);
        if let Some(error) = error {
            result = result.with_error(error);
        }
        result
    }

    /// 顺序执行一组场景
    pub async fn run_all(&self, scenarios: &[Box<dyn Scenario>]) -> SuiteResults {
        let mut suite = SuiteResults::new(SUITE_NAME);
        for scenario in scenarios {
            suite.add_result(self.run_one(scenario.as_ref()).await);
        }

        info!(
            total = suite.total,
            passed = suite.passed,
            failed = suite.failed,
            skipped = suite.skipped,
            expected_failures = suite.expected_failures,
            pass_rate = format!("{:.1}%", suite.pass_rate()),
            "一致性测试完成"
        );
        suite
    }
}

// ============================================================================
// 单元测试
// ============================================================================
