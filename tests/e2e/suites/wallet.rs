//! 钱包与转赠测试套件

use crate::setup::TestEnvironment;

#[cfg(test)]
mod wallet_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_open_wallet() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-REDEEM-01");
    }

    /// 转赠后由接收方核销
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_gift_then_redeem() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "GF-A01");
    }
}
