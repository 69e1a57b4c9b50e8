//! 商户入驻与账号注册

use kado_client::dto::{Role, VerificationStatus, VoucherStatus};
use kado_shared::Result;

use crate::context::FlowContext;
use crate::fixtures;
use crate::model::ensure;
use crate::model::lifecycle::{verify_merchant_status, verify_voucher_status};
use crate::rejection::{RejectionKind, expect_rejection};
use crate::report::Verdict;

/// MO-A01：注册 → PENDING → 审核通过 → APPROVED → 发布券 → ACTIVE
pub async fn merchant_registration(ctx: &FlowContext) -> Result<Verdict> {
    let merchant = ctx.onboard_merchant().await?;
    let voucher = ctx.publish_default_voucher(&merchant).await?;
    verify_voucher_status(&voucher, None, VoucherStatus::Active)?;
    Ok(Verdict::Passed(vec![
        format!("merchant {} approved", merchant.merchant_id),
        format!("voucher {} active", voucher.id),
    ]))
}

/// BF-ADMIN-01：管理员能看到待审核商户的完整资料，并能驳回
pub async fn admin_review(ctx: &FlowContext) -> Result<Verdict> {
    let admin = ctx.admin_token().await?;
    let mut notes = Vec::new();

    let (_, merchant_id) = ctx.register_pending_merchant().await?;
    let details = ctx.platform.merchants.get(&admin, merchant_id).await?;
    verify_merchant_status(&details, None, VerificationStatus::Pending)?;
    ensure(details.id == merchant_id, || {
        format!("查询到的商户 {} 与提交的 {} 不符", details.id, merchant_id)
    })?;
    ensure(details.business_license.is_some(), || {
        format!("商户 {} 缺少营业执照信息", merchant_id)
    })?;
    ensure(details.bank_account_number.is_some(), || {
        format!("商户 {} 缺少银行账户信息", merchant_id)
    })?;
    notes.push(format!("reviewed {}", details.business_name));

    match ctx.platform.merchants.pending(&admin).await {
        Ok(pending) if pending.iter().any(|m| m.id == merchant_id) => {
            notes.push("listed in pending applications".to_string());
        }
        Ok(pending) => notes.push(format!(
            "not on the first page of {} pending applications",
            pending.len()
        )),
        Err(e) => notes.push(format!("pending listing unavailable: {}", e)),
    }

    let (_, rejected_id) = ctx.register_pending_merchant().await?;
    let reason = "Business license could not be verified";
    let rejected = ctx.platform.merchants.reject(&admin, rejected_id, reason).await?;
    verify_merchant_status(
        &rejected,
        Some(VerificationStatus::Pending),
        VerificationStatus::Rejected,
    )?;
    if let Some(recorded) = &rejected.rejection_reason {
        ensure(recorded == reason, || {
            format!("驳回原因未保存: 期望 {:?}，实际 {:?}", reason, recorded)
        })?;
    }
    notes.push(format!("merchant {} rejected", rejected_id));

    Ok(Verdict::Passed(notes))
}

/// BF-ADMIN-02：审核通过后商户即可发布券
pub async fn approval_enables_publishing(ctx: &FlowContext) -> Result<Verdict> {
    let admin = ctx.admin_token().await?;
    let (actor, merchant_id) = ctx.register_pending_merchant().await?;

    let approved = ctx.platform.merchants.approve(&admin, merchant_id).await?;
    verify_merchant_status(
        &approved,
        Some(VerificationStatus::Pending),
        VerificationStatus::Approved,
    )?;

    let profile = ctx.platform.merchants.my_profile(&actor.token).await?;
    verify_merchant_status(&profile, None, VerificationStatus::Approved)?;

    let merchant = crate::context::MerchantActor { actor, merchant_id };
    let voucher = ctx.publish_default_voucher(&merchant).await?;
    Ok(Verdict::passed_with(format!(
        "merchant {} published voucher {}",
        merchant_id, voucher.id
    )))
}

/// MO-N01：同一邮箱第二次注册返回 409
pub async fn duplicate_email(ctx: &FlowContext) -> Result<Verdict> {
    let first = fixtures::register_request(Role::Consumer, "duplicate");
    ctx.platform.auth.register(&first).await?;

    let mut second = fixtures::register_request(Role::Consumer, "duplicate");
    second.email = first.email.clone();
    let raw = ctx.platform.auth.register_raw(&second).await?;
    expect_rejection(&raw, &[409], RejectionKind::DuplicateEmail)?;

    Ok(Verdict::passed_with(format!("{} rejected on reuse", first.email)))
}
