//! 商户核销：全额、部分与重复核销

use kado_client::dto::{Role, WalletEntry};
use kado_shared::money::{money, round_money};
use kado_shared::{KadoError, Result};
use rust_decimal::Decimal;
use tracing::info;

use crate::context::{Actor, FlowContext, MerchantActor, wait_for_wallet_entry};
use crate::model::ensure;
use crate::model::redemption::{ReuseVerdict, classify_reuse, verify_redemption_accepted};
use crate::model::wallet::BalanceTracker;
use crate::rejection::{RejectionKind, expect_rejection};
use crate::report::Verdict;

/// 已购券的消费者及发券商户
struct Holder {
    merchant: MerchantActor,
    consumer: Actor,
    entry: WalletEntry,
}

async fn holder(ctx: &FlowContext) -> Result<Holder> {
    let (merchant, voucher) = ctx.merchant_with_voucher().await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    ctx.purchase(&consumer, voucher.id, ctx.first_denomination(&voucher)?)
        .await?;
    let entry = ctx.wait_for_voucher(&consumer, voucher.id).await?;
    Ok(Holder {
        merchant,
        consumer,
        entry,
    })
}

fn face_value(entry: &WalletEntry) -> Result<Decimal> {
    entry
        .balance()
        .ok_or_else(|| KadoError::invariant(format!("钱包券 {} 没有面值", entry.voucher_code)))
}

/// 等待钱包余额低于 `below`
async fn wait_for_balance_below(
    ctx: &FlowContext,
    owner: &Actor,
    code: &str,
    below: Decimal,
) -> Result<WalletEntry> {
    wait_for_wallet_entry(&ctx.platform.wallet, &ctx.poll_policy(), &owner.token, |e| {
        e.voucher_code == code && (e.is_spent() || e.balance().is_some_and(|b| b < below))
    })
    .await
}

/// 等待余额耗尽后的钱包快照，超时则取当前快照
async fn spent_snapshot(ctx: &FlowContext, owner: &Actor, code: &str) -> Result<Option<WalletEntry>> {
    let spent = wait_for_wallet_entry(&ctx.platform.wallet, &ctx.poll_policy(), &owner.token, |e| {
        e.voucher_code == code && e.is_spent()
    })
    .await;
    match spent {
        Ok(entry) => Ok(Some(entry)),
        Err(KadoError::Timeout { .. }) => ctx.find_wallet_entry(owner, code).await,
        Err(KadoError::Unavailable { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// 重放后的钱包快照，钱包不可用时为 `None`
async fn snapshot(ctx: &FlowContext, owner: &Actor, code: &str) -> Result<Option<WalletEntry>> {
    match ctx.find_wallet_entry(owner, code).await {
        Err(KadoError::Unavailable { .. }) => Ok(None),
        other => other,
    }
}

/// VR-N01：已全额核销的券再次核销不得重复扣款
pub async fn reuse_used_voucher(ctx: &FlowContext) -> Result<Verdict> {
    let Holder {
        merchant,
        consumer,
        entry,
    } = holder(ctx).await?;
    let amount = face_value(&entry)?;

    let first = ctx.redeem(&merchant, &entry.voucher_code, amount).await?;
    verify_redemption_accepted(&first)?;
    let before = spent_snapshot(ctx, &consumer, &entry.voucher_code).await?;

    let reuse = ctx.redeem_raw(&merchant, &entry.voucher_code, amount).await?;
    let after = snapshot(ctx, &consumer, &entry.voucher_code).await?;
    let verdict = classify_reuse(&first, &reuse, before.as_ref(), after.as_ref())?;
    ensure(verdict.is_acceptable(), || verdict.describe())?;

    info!(voucher_code = %entry.voucher_code, ?verdict, "重复核销判定");
    Ok(Verdict::passed_with(verdict.describe()))
}

/// VR-A03：两次部分核销，余额逐次递减至 0，超额核销被拒绝
pub async fn partial_redemption(ctx: &FlowContext) -> Result<Verdict> {
    let Holder {
        merchant,
        consumer,
        entry,
    } = holder(ctx).await?;
    let code = entry.voucher_code.clone();
    let mut tracker = BalanceTracker::new(&entry)?;
    let full = face_value(&entry)?;

    let partial = round_money(full / Decimal::TWO);
    let first = ctx.redeem(&merchant, &code, partial).await?;
    verify_redemption_accepted(&first)?;
    let after_first = wait_for_balance_below(ctx, &consumer, &code, full).await?;
    tracker.verify_redeemed(&after_first, partial)?;
    let remaining = tracker.current();

    let over = ctx.redeem_raw(&merchant, &code, remaining + money(100)).await?;
    expect_rejection(&over, &[400, 409, 422], RejectionKind::InsufficientBalance)?;

    let second = ctx.redeem(&merchant, &code, remaining).await?;
    verify_redemption_accepted(&second)?;
    let after_second = wait_for_balance_below(ctx, &consumer, &code, remaining).await?;
    tracker.verify_redeemed(&after_second, remaining)?;
    ensure(after_second.is_spent() || tracker.current().is_zero(), || {
        format!("券 {} 全部核销后仍有余额 {}", code, tracker.current())
    })?;

    Ok(Verdict::Passed(vec![
        format!("{} -> {} after {}", full, remaining, partial),
        format!("over-redemption refused with {}", over.status),
        "balance exhausted".to_string(),
    ]))
}

/// BF-REDEEM-03：首次核销被受理，并出现在商户核销记录中
pub async fn validates_first_redemption(ctx: &FlowContext) -> Result<Verdict> {
    let Holder {
        merchant, entry, ..
    } = holder(ctx).await?;
    let redemption = ctx
        .redeem(&merchant, &entry.voucher_code, face_value(&entry)?)
        .await?;
    verify_redemption_accepted(&redemption)?;

    let mut notes = vec![format!("redemption #{} {:?}", redemption.id, redemption.status)];
    match ctx
        .platform
        .redemptions
        .my_redemptions(&merchant.actor.token)
        .await
    {
        Ok(history) if history.iter().any(|r| r.id == redemption.id) => {
            notes.push("listed in merchant history".to_string());
        }
        Ok(history) => notes.push(format!(
            "not in first page of {} merchant redemptions",
            history.len()
        )),
        Err(e) => notes.push(format!("merchant history unavailable: {}", e)),
    }
    Ok(Verdict::Passed(notes))
}

/// BF-REDEEM-05：余额耗尽后再次核销只能被拒绝或返回原记录
pub async fn used_voucher_validation(ctx: &FlowContext) -> Result<Verdict> {
    let Holder {
        merchant,
        consumer,
        entry,
    } = holder(ctx).await?;
    let amount = face_value(&entry)?;

    let first = ctx.redeem(&merchant, &entry.voucher_code, amount).await?;
    verify_redemption_accepted(&first)?;
    let spent = wait_for_wallet_entry(&ctx.platform.wallet, &ctx.poll_policy(), &consumer.token, |e| {
        e.voucher_code == entry.voucher_code && e.is_spent()
    })
    .await?;

    let reuse = ctx.redeem_raw(&merchant, &entry.voucher_code, amount).await?;
    let after = snapshot(ctx, &consumer, &entry.voucher_code).await?;
    let verdict = classify_reuse(&first, &reuse, Some(&spent), after.as_ref())?;
    ensure(
        matches!(
            verdict,
            ReuseVerdict::Rejected { .. } | ReuseVerdict::Idempotent { .. }
        ),
        || format!("已用完的券再次核销: {}", verdict.describe()),
    )?;
    Ok(Verdict::passed_with(verdict.describe()))
}
