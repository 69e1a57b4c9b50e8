//! 商户入驻测试套件

use crate::setup::TestEnvironment;

#[cfg(test)]
mod onboarding_tests {
    use super::*;
    use kado_client::dto::VerificationStatus;

    /// 注册 → 审核通过 → 发布券
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_merchant_registration() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "MO-A01");
    }

    /// 待审核商户资料完整，可被驳回
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_admin_review() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "BF-ADMIN-01");
    }

    /// 审核通过后商户资料变为 APPROVED
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_approval_updates_profile() {
        let env = TestEnvironment::setup().await.unwrap();
        let merchant = env.ctx.onboard_merchant().await.unwrap();

        let profile = env
            .ctx
            .platform
            .merchants
            .my_profile(&merchant.actor.token)
            .await
            .unwrap();
        assert_eq!(profile.id, merchant.merchant_id);
        assert_eq!(profile.verification_status, VerificationStatus::Approved);

        crate::assert_scenario_ok!(env, "BF-ADMIN-02");
    }

    /// 重复邮箱注册返回 409
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_duplicate_email() {
        let env = TestEnvironment::setup().await.unwrap();
        crate::assert_scenario_ok!(env, "MO-N01");
    }
}
