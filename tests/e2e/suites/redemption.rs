//! 核销测试套件

use crate::helpers::*;
use crate::setup::TestEnvironment;

#[cfg(test)]
mod redemption_tests {
    use super::*;
    use kado_client::dto::Role;
    use kado_shared::money::round_money;
    use rust_decimal::Decimal;

    /// 部分核销后余额为面值减去核销额
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_partial_redemption_balance() {
        let env = TestEnvironment::setup().await.unwrap();
        let (merchant, voucher) = env.ctx.merchant_with_voucher().await.unwrap();
        let denomination = env.ctx.first_denomination(&voucher).unwrap();
        let consumer = env
            .ctx
            .register_actor(Role::Consumer, "e2e-consumer")
            .await
            .unwrap();
        env.ctx
            .purchase(&consumer, voucher.id, denomination)
            .await
            .unwrap();
        let entry = env.ctx.wait_for_voucher(&consumer, voucher.id).await.unwrap();

        let partial = round_money(denomination / Decimal::TWO);
        env.ctx
            .redeem(&merchant, &entry.voucher_code, partial)
            .await
            .unwrap();

        let after = env
            .ctx
            .find_wallet_entry(&consumer, &entry.voucher_code)
            .await
            .unwrap()
            .expect("钱包中应仍有该券");
        crate::assert_money_eq!(
            after.balance().unwrap_or_default(),
            denomination - partial
        );
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_partial_redemption() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "VR-A03");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_first_redemption() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-REDEEM-03");
    }

    /// 已用券再次核销不得重复扣款
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_reuse_used_voucher() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "VR-N01");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_used_voucher_validation() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-REDEEM-05");
    }
}
