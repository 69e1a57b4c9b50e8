//! 商户审核与券商品的生命周期

use kado_client::dto::{MerchantDto, VerificationStatus, VoucherDto, VoucherStatus};
use kado_shared::Result;

use super::ensure;

/// 商户审核状态迁移
///
/// PENDING → APPROVED | REJECTED，APPROVED → SUSPENDED，SUSPENDED → APPROVED（恢复）。
pub fn merchant_can_transition(from: VerificationStatus, to: VerificationStatus) -> bool {
    use VerificationStatus::*;
    matches!(
        (from, to),
        (Pending, Approved) | (Pending, Rejected) | (Approved, Suspended) | (Suspended, Approved)
    ) || from == to
}

/// 券商品状态迁移
pub fn voucher_can_transition(from: VoucherStatus, to: VoucherStatus) -> bool {
    use VoucherStatus::*;
    matches!(
        (from, to),
        (Draft, Active)
            | (Active, Paused)
            | (Paused, Active)
            | (Active, Expired)
            | (Draft, Deleted)
            | (Active, Deleted)
            | (Paused, Deleted)
    ) || from == to
}

/// 商户状态应为 `expected`，且从 `previous` 迁移合法
pub fn verify_merchant_status(
    merchant: &MerchantDto,
    previous: Option<VerificationStatus>,
    expected: VerificationStatus,
) -> Result<()> {
    ensure(merchant.verification_status == expected, || {
        format!(
            "商户 {} 状态应为 {:?}，实际 {:?}",
            merchant.id, expected, merchant.verification_status
        )
    })?;
    if let Some(from) = previous {
        ensure(merchant_can_transition(from, expected), || {
            format!("商户状态非法迁移 {:?} -> {:?}", from, expected)
        })?;
    }
    Ok(())
}

/// 券商品状态应为 `expected`，且从 `previous` 迁移合法
pub fn verify_voucher_status(
    voucher: &VoucherDto,
    previous: Option<VoucherStatus>,
    expected: VoucherStatus,
) -> Result<()> {
    ensure(voucher.status == expected, || {
        format!(
            "券 {} 状态应为 {:?}，实际 {:?}",
            voucher.id, expected, voucher.status
        )
    })?;
    if let Some(from) = previous {
        ensure(voucher_can_transition(from, expected), || {
            format!("券 {} 状态非法迁移 {:?} -> {:?}", voucher.id, from, expected)
        })?;
    }
    Ok(())
}
