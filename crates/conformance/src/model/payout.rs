//! 被暂停商户不得出现在结算发放名单中

use kado_client::dto::{PayoutHold, PayoutSimulation};
use kado_shared::Result;

use super::ensure;

/// 发放名单中不包含该商户；返回商户是否同时出现在暂扣队列中
pub fn verify_payout_exclusion(merchant_id: i64, simulation: &PayoutSimulation) -> Result<bool> {
    let paid: Vec<_> = simulation
        .payouts
        .iter()
        .filter(|p| p.merchant_id == merchant_id)
        .collect();
    ensure(paid.is_empty(), || {
        format!(
            "被暂停商户 {} 出现在结算发放名单中 ({} 笔)",
            merchant_id,
            paid.len()
        )
    })?;
    Ok(is_held(merchant_id, &simulation.hold_queue))
}

pub fn is_held(merchant_id: i64, holds: &[PayoutHold]) -> bool {
    holds.iter().any(|h| h.merchant_id == merchant_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn simulation(payouts: serde_json::Value, holds: serde_json::Value) -> PayoutSimulation {
        serde_json::from_value(json!({
            "weekEnding": "2026-10-18",
            "payouts": payouts,
            "holdQueue": holds
        }))
        .unwrap()
    }

    #[test]
    fn test_held_merchant_excluded() {
        let sim = simulation(json!([{"merchantId": 1}]), json!([{"merchantId": 7, "reason": "Suspended"}]));
        assert!(verify_payout_exclusion(7, &sim).unwrap());
    }

    #[test]
    fn test_exclusion_without_hold_entry() {
        let sim = simulation(json!([]), json!([]));
        assert!(!verify_payout_exclusion(7, &sim).unwrap());
    }

    #[test]
    fn test_paid_suspended_merchant_fails() {
        let sim = simulation(json!([{"merchantId": 7, "amount": 23.0}]), json!([]));
        assert!(verify_payout_exclusion(7, &sim).is_err());
    }
}
