//! 结算测试套件

use crate::setup::TestEnvironment;

#[cfg(test)]
mod payout_tests {
    use super::*;

    /// 被暂停商户不出现在结算发放名单中
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_suspended_merchant_excluded() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "PO-N01");
    }
}
