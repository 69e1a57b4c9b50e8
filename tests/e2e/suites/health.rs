//! 服务健康测试套件

use crate::setup::{TestEnvConfig, TestEnvironment};

#[cfg(test)]
mod health_tests {
    use super::*;

    /// 所有服务 /actuator/health 报告 UP
    #[tokio::test]
    #[ignore = "需要运行服务"]
    async fn test_service_matrix() {
        let env = TestEnvironment::setup_with_config(TestEnvConfig {
            skip_health_check: true,
            ..Default::default()
        })
        .await
        .unwrap();

        let results = env.services.check_all_services().await;
        let unhealthy: Vec<_> = results.iter().filter(|(_, h)| !h.is_healthy()).collect();
        assert!(unhealthy.is_empty(), "服务不健康: {:?}", unhealthy);

        crate::assert_scenario_ok!(env, "HEALTH-01");
    }
}
