//! Kado24 平台端到端一致性测试套件
//!
//! 对运行中的平台执行黑盒场景：每个场景从零注册用户、入驻商户、发布券，
//! 驱动购买、支付、发券、转赠、核销与结算流程，并用参考模型校验平台行为。
//!
//! - [`context`] 场景共用的流程积木
//! - [`model`] 订单、库存、余额、营收、生命周期的参考模型
//! - [`scenarios`] 场景注册表
//! - [`runner`] 顺序执行场景并汇总报告

pub mod cli;
pub mod context;
pub mod fixtures;
pub mod model;
pub mod rejection;
pub mod report;
pub mod runner;
pub mod scenarios;

pub use context::FlowContext;
pub use report::{ConformanceResult, ScenarioOutcome, SuiteResults, Verdict};
pub use runner::ScenarioRunner;
