//! 执行结果与汇总报告

use std::fmt::Write as _;

use serde::Serialize;

/// 单个场景的结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioOutcome {
    Passed,
    Failed,
    /// 前置条件不满足或瞬时故障重试耗尽
    Skipped,
    /// 依赖的基础设施（钱包、结算）不可用
    ExpectedFailure,
}

impl ScenarioOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::ExpectedFailure => "expected_failure",
        }
    }

    /// 是否计入通过率
    pub fn is_executed(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// 场景体的正常返回
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 通过，附带过程说明
    Passed(Vec<String>),
    /// 主动跳过（缺少前置配置等）
    Skipped(String),
}

impl Verdict {
    pub fn passed() -> Self {
        Self::Passed(Vec::new())
    }

    pub fn passed_with(note: impl Into<String>) -> Self {
        Self::Passed(vec![note.into()])
    }
}

/// 单个场景的执行结果
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceResult {
    pub scenario_id: String,
    pub title: String,
    pub outcome: ScenarioOutcome,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ConformanceResult {
    pub fn new(
        scenario_id: impl Into<String>,
        title: impl Into<String>,
        outcome: ScenarioOutcome,
        duration_ms: u64,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            title: title.into(),
            outcome,
            duration_ms,
            error: None,
            notes: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteResults {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub duration_ms: u64,
    pub results: Vec<ConformanceResult>,
}

impl SuiteResults {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: ConformanceResult) {
        self.total += 1;
        match result.outcome {
            ScenarioOutcome::Passed => self.passed += 1,
            ScenarioOutcome::Failed => self.failed += 1,
            ScenarioOutcome::Skipped => self.skipped += 1,
            ScenarioOutcome::ExpectedFailure => self.expected_failures += 1,
        }
        self.duration_ms += result.duration_ms;
        self.results.push(result);
    }

    /// 没有任何失败（跳过与预期失败不算失败）
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// 通过率（百分比），只统计实际执行的场景
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            100.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConformanceResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == ScenarioOutcome::Failed)
    }

    /// 终端可读的文本报告
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.name);
        for result in &self.results {
            let _ = writeln!(
                out,
                "[{:>16}] {:<16} {} ({} ms)",
                result.outcome.as_str(),
                result.scenario_id,
                result.title,
                result.duration_ms
            );
            if let Some(error) = &result.error {
                let _ = writeln!(out, "    error: {}", error);
            }
            for note in &result.notes {
                let _ = writeln!(out, "    - {}", note);
            }
        }
        let _ = writeln!(
            out,
            "total {} | passed {} | failed {} | skipped {} | expected failures {} | pass rate {:.1}%",
            self.total,
            self.passed,
            self.failed,
            self.skipped,
            self.expected_failures,
            self.pass_rate()
        );
        out
    }
}
