//! Kado24 平台端到端测试
//!
//! 测试覆盖完整的业务流程，包括：
//! - 服务健康
//! - 商户入驻与审核
//! - 购买、支付与库存
//! - 钱包发券与转赠
//! - 全额、部分与重复核销
//! - 营收拆分与结算冻结
//!
//! 所有用例都需要运行中的平台，默认 `#[ignore]`，使用
//! `cargo test --test e2e -- --ignored` 执行。

pub mod helpers;
pub mod setup;
pub mod suites;

pub use setup::TestEnvironment;
