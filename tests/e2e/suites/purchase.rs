//! 购买流程测试套件

use crate::helpers::*;
use crate::setup::TestEnvironment;

#[cfg(test)]
mod normal_purchase_tests {
    use super::*;
    use kado_client::dto::Role;

    /// 完整购买：下单 → 支付 → 发券 → 核销
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_full_purchase_flow() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "CP-A01");
    }

    /// 支付成功后钱包恰好一张券
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_payment_issues_one_voucher() {
        let env = TestEnvironment::setup().await.unwrap();
        let (_, voucher) = env.ctx.merchant_with_voucher().await.unwrap();
        let denomination = env.ctx.first_denomination(&voucher).unwrap();
        let consumer = env
            .ctx
            .register_actor(Role::Consumer, "e2e-consumer")
            .await
            .unwrap();

        let purchase = env
            .ctx
            .purchase(&consumer, voucher.id, denomination)
            .await
            .unwrap();
        crate::assert_money_eq!(purchase.order.total_amount, denomination);

        let entry = env.ctx.wait_for_voucher(&consumer, voucher.id).await.unwrap();
        assert_balance(&entry, denomination);
        let entries = env.ctx.platform.wallet.list(&consumer.token).await.unwrap();
        assert_wallet_count(&entries, voucher.id, 1);
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_multiple_vouchers() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "CP-A04");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_each_denomination() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-PURCHASE-03");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_aba_payment() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-PURCHASE-04");
    }

    /// 十个消费者购买后库存扣减
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_many_consumers() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-CYCLE-02");
    }
}
