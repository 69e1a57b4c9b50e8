//! 营收拆分测试套件

use crate::setup::TestEnvironment;

#[cfg(test)]
mod revenue_tests {
    use super::*;
    use kado_client::dto::Role;
    use kado_shared::money::money;

    /// 100.00 订单拆分为 8.00 / 92.00
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_hundred_dollar_split() {
        let env = TestEnvironment::setup().await.unwrap();
        let merchant = env.ctx.onboard_merchant().await.unwrap();
        let voucher = env
            .ctx
            .publish_voucher(&merchant, "E2E Premium", vec![money(10000)], 10)
            .await
            .unwrap();
        let consumer = env
            .ctx
            .register_actor(Role::Consumer, "e2e-consumer")
            .await
            .unwrap();

        let order = env
            .ctx
            .purchase(&consumer, voucher.id, money(10000))
            .await
            .unwrap()
            .order;
        crate::assert_money_eq!(order.platform_fee.unwrap_or_default(), money(800));
        crate::assert_money_eq!(order.merchant_amount.unwrap_or_default(), money(9200));
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_complete_cycle() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-CYCLE-01");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_single_order_split() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-MONEY-01");
    }

    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_aggregate_split() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-MONEY-04");
    }
}
