//! 已用券重复核销的判定
//!
//! 平台对重复核销有几种合法表现，这里只断言“不能两次独立地全额核销”。

use kado_client::RawResponse;
use kado_client::dto::{RedemptionDto, WalletEntry};
use kado_shared::{KadoError, Result};
use rust_decimal::Decimal;

use crate::rejection::RejectionKind;

/// 核销应被受理（PENDING / CONFIRMED / COMPLETED）
pub fn verify_redemption_accepted(redemption: &RedemptionDto) -> Result<()> {
    if redemption.status.is_accepted() {
        Ok(())
    } else {
        Err(KadoError::invariant(format!(
            "核销 #{} 未被受理: {:?}",
            redemption.id, redemption.status
        )))
    }
}

/// 重复核销的判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReuseVerdict {
    /// 4xx 拒绝并带可识别原因
    Rejected { status: u16 },
    /// 200 返回的是上一次的核销记录
    Idempotent { redemption_id: i64 },
    /// 200 返回新记录但未扣减任何金额，钱包仍为 0 / USED
    ExhaustedAfterReplay { redemption_id: i64 },
    /// 重放产生了新的扣款，或余额被再次动用
    DoubleSpend { redemption_id: i64 },
}

impl ReuseVerdict {
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Self::DoubleSpend { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Rejected { status } => format!("重复核销被拒绝 ({})", status),
            Self::Idempotent { redemption_id } => {
                format!("重复核销返回原记录 #{}", redemption_id)
            }
            Self::ExhaustedAfterReplay { redemption_id } => {
                format!("重复核销产生记录 #{}，但余额已耗尽", redemption_id)
            }
            Self::DoubleSpend { redemption_id } => {
                format!("重复核销产生新记录 #{} 并再次扣款", redemption_id)
            }
        }
    }
}

/// 对重复核销的响应分类
///
/// `before` 为重放前观测到的钱包条目，`after` 为重放后的条目，钱包不可用时传 `None`。
/// 重放前余额已为 0 时，任何带正金额的新核销记录都是重复扣款。
pub fn classify_reuse(
    first: &RedemptionDto,
    reuse: &RawResponse,
    before: Option<&WalletEntry>,
    after: Option<&WalletEntry>,
) -> Result<ReuseVerdict> {
    if reuse.is_server_error() {
        return Err(KadoError::invariant(format!(
            "重复核销返回服务端错误 {}: {}",
            reuse.status,
            reuse.error_message()
        )));
    }

    if !reuse.is_success() {
        let message = reuse.combined_message();
        if !RejectionKind::AlreadyRedeemed.matches(&message) {
            return Err(KadoError::invariant(format!(
                "重复核销被拒绝但原因不可识别 ({}): {}",
                reuse.status, message
            )));
        }
        return Ok(ReuseVerdict::Rejected {
            status: reuse.status,
        });
    }

    let replay: RedemptionDto = reuse.decode_data()?;
    if replay.id == first.id {
        return Ok(ReuseVerdict::Idempotent {
            redemption_id: replay.id,
        });
    }

    let (Some(before), Some(after)) = (before, after) else {
        return Err(KadoError::unavailable(
            "wallet",
            "无法确认重复核销前后的余额",
        ));
    };
    let double_spend = ReuseVerdict::DoubleSpend {
        redemption_id: replay.id,
    };

    let available = remaining(before);
    if replay.amount.is_some_and(|amount| amount > available) {
        return Ok(double_spend);
    }
    if !after.is_spent() || remaining(after) < available {
        return Ok(double_spend);
    }
    Ok(ReuseVerdict::ExhaustedAfterReplay {
        redemption_id: replay.id,
    })
}

fn remaining(entry: &WalletEntry) -> Decimal {
    if entry.is_spent() {
        Decimal::ZERO
    } else {
        entry.balance().unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn raw(status: u16, body: Value) -> RawResponse {
        RawResponse {
            service: "redemption",
            status,
            text: body.to_string(),
            body,
        }
    }

    fn first() -> RedemptionDto {
        serde_json::from_value(json!({"id": 5, "status": "COMPLETED"})).unwrap()
    }

    fn wallet(remaining: f64, status: &str) -> WalletEntry {
        serde_json::from_value(json!({
            "id": 1, "voucherCode": "KADO-1", "denomination": 25.0,
            "remainingValue": remaining, "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_rejection_with_keyword() {
        let response = raw(400, json!({"success": false, "message": "Voucher already used"}));
        let verdict = classify_reuse(&first(), &response, None, None).unwrap();
        assert_eq!(verdict, ReuseVerdict::Rejected { status: 400 });
    }

    #[test]
    fn test_rejection_without_keyword_fails() {
        let response = raw(400, json!({"success": false, "message": "Bad request"}));
        assert!(classify_reuse(&first(), &response, None, None).is_err());
    }

    #[test]
    fn test_same_record_is_idempotent() {
        let response = raw(200, json!({"success": true, "data": {"id": 5, "status": "COMPLETED"}}));
        let verdict = classify_reuse(&first(), &response, None, None).unwrap();
        assert_eq!(verdict, ReuseVerdict::Idempotent { redemption_id: 5 });
    }

    #[test]
    fn test_new_record_without_charge_after_exhaustion() {
        let response = raw(200, json!({"success": true, "data": {"id": 6, "status": "COMPLETED"}}));
        let spent = wallet(0.0, "USED");

        let verdict = classify_reuse(&first(), &response, Some(&spent), Some(&spent)).unwrap();
        assert_eq!(verdict, ReuseVerdict::ExhaustedAfterReplay { redemption_id: 6 });
        assert!(verdict.is_acceptable());

        let zero_amount = raw(
            200,
            json!({"success": true, "data": {"id": 6, "amount": 0.0, "status": "COMPLETED"}}),
        );
        let verdict = classify_reuse(&first(), &zero_amount, Some(&spent), Some(&spent)).unwrap();
        assert!(verdict.is_acceptable());
    }

    #[test]
    fn test_new_charge_against_spent_voucher_is_double_spend() {
        let response = raw(
            200,
            json!({"success": true, "data": {"id": 6, "amount": 25.0, "status": "COMPLETED"}}),
        );
        let spent = wallet(0.0, "USED");

        let verdict = classify_reuse(&first(), &response, Some(&spent), Some(&spent)).unwrap();
        assert_eq!(verdict, ReuseVerdict::DoubleSpend { redemption_id: 6 });
        assert!(!verdict.is_acceptable());
    }

    #[test]
    fn test_new_record_with_funded_wallet_is_double_spend() {
        let response = raw(200, json!({"success": true, "data": {"id": 6, "status": "COMPLETED"}}));
        let spent = wallet(0.0, "USED");
        let funded = wallet(25.0, "ACTIVE");

        let verdict = classify_reuse(&first(), &response, Some(&spent), Some(&funded)).unwrap();
        assert_eq!(verdict, ReuseVerdict::DoubleSpend { redemption_id: 6 });
        let verdict = classify_reuse(&first(), &response, Some(&funded), Some(&funded)).unwrap();
        assert_eq!(verdict, ReuseVerdict::DoubleSpend { redemption_id: 6 });
    }

    #[test]
    fn test_new_record_without_wallet_is_unavailable() {
        let response = raw(200, json!({"success": true, "data": {"id": 6, "status": "COMPLETED"}}));
        let spent = wallet(0.0, "USED");

        let err = classify_reuse(&first(), &response, Some(&spent), None).unwrap_err();
        assert!(matches!(err, KadoError::Unavailable { .. }));
        let err = classify_reuse(&first(), &response, None, None).unwrap_err();
        assert!(matches!(err, KadoError::Unavailable { .. }));
    }

    #[test]
    fn test_redemption_acceptance() {
        assert!(verify_redemption_accepted(&first()).is_ok());
        let disputed: RedemptionDto =
            serde_json::from_value(json!({"id": 9, "status": "DISPUTED"})).unwrap();
        assert!(verify_redemption_accepted(&disputed).is_err());
    }

    #[test]
    fn test_server_error_is_violation() {
        let response = raw(500, json!({"message": "boom"}));
        assert!(matches!(
            classify_reuse(&first(), &response, None, None),
            Err(KadoError::Invariant(_))
        ));
    }
}
