//! 测试套件模块
//!
//! 按业务功能组织的测试用例集合。

pub mod health;
pub mod onboarding;
pub mod payment;
pub mod payout;
pub mod purchase;
pub mod redemption;
pub mod revenue;
pub mod wallet;

#[cfg(test)]
mod registry_tests {
    use kado_conformance::scenarios;

    /// 套件中引用的场景都已注册
    #[test]
    fn test_suite_scenarios_are_registered() {
        let ids = [
            "HEALTH-01", "MO-A01", "BF-ADMIN-01", "BF-ADMIN-02", "MO-N01", "CP-A01", "CP-A04",
            "BF-PURCHASE-03", "BF-PURCHASE-04", "BF-CYCLE-02", "CP-N01", "BF-PURCHASE-07",
            "BF-CYCLE-04", "CP-N02", "CP-N03", "CP-N05", "CP-N06", "CP-N04", "GF-A01",
            "BF-REDEEM-01", "VR-N01", "VR-A03", "BF-REDEEM-03", "BF-REDEEM-05", "BF-CYCLE-01",
            "BF-MONEY-01", "BF-MONEY-04", "PO-N01",
        ];
        for id in ids {
            assert!(scenarios::find(id).is_some(), "场景 {} 未注册", id);
        }
        assert_eq!(scenarios::all().len(), ids.len());
    }
}
