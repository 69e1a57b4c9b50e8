//! 钱包与转赠

use kado_client::dto::{GiftRequest, Role, WalletEntryStatus};
use kado_shared::Result;

use crate::context::{FlowContext, wait_for_wallet_entry};
use crate::model::ensure;
use crate::model::redemption::verify_redemption_accepted;
use crate::model::wallet::verify_gift_transfer;
use crate::report::Verdict;

/// GF-A01：购买后转赠，接收方持券并可在商户处核销
pub async fn gift_then_redeem(ctx: &FlowContext) -> Result<Verdict> {
    let (merchant, voucher) = ctx.merchant_with_voucher().await?;
    let denomination = ctx.first_denomination(&voucher)?;
    let sender = ctx.register_actor(Role::Consumer, "gift-sender").await?;
    let recipient = ctx.register_actor(Role::Consumer, "gift-recipient").await?;

    ctx.purchase(&sender, voucher.id, denomination).await?;
    let original = ctx.wait_for_voucher(&sender, voucher.id).await?;

    let request = GiftRequest {
        recipient_user_id: recipient.id(),
        gift_message: Some("Enjoy your coffee".to_string()),
    };
    let gifted = ctx
        .platform
        .wallet
        .gift(&sender.token, original.id, &request)
        .await?;
    ensure(gifted.status == WalletEntryStatus::Active, || {
        format!("转赠返回的券状态为 {:?}", gifted.status)
    })?;

    let code = original.voucher_code.clone();
    wait_for_wallet_entry(
        &ctx.platform.wallet,
        &ctx.poll_policy(),
        &recipient.token,
        |e| e.voucher_code == code,
    )
    .await?;

    let sender_after = ctx.platform.wallet.list(&sender.token).await?;
    let recipient_entries = ctx.platform.wallet.list(&recipient.token).await?;
    verify_gift_transfer(&original, &sender_after, &recipient_entries, recipient.id())?;

    let redemption = ctx.redeem(&merchant, &code, denomination).await?;
    verify_redemption_accepted(&redemption)?;

    Ok(Verdict::Passed(vec![
        format!("{} gifted to user {}", code, recipient.id()),
        format!("redeemed by recipient as #{}", redemption.id),
    ]))
}

/// BF-REDEEM-01：支付后钱包中出现带券码的可用券
pub async fn open_wallet(ctx: &FlowContext) -> Result<Verdict> {
    let (_, voucher) = ctx.merchant_with_voucher().await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    ctx.purchase(&consumer, voucher.id, ctx.first_denomination(&voucher)?)
        .await?;

    let entry = ctx.wait_for_voucher(&consumer, voucher.id).await?;
    ensure(entry.status == WalletEntryStatus::Active, || {
        format!("新发放的券状态为 {:?}", entry.status)
    })?;
    ensure(!entry.voucher_code.trim().is_empty(), || {
        format!("钱包券 #{} 没有券码", entry.id)
    })?;

    Ok(Verdict::passed_with(format!(
        "voucher {} ready with balance {:?}",
        entry.voucher_code,
        entry.balance()
    )))
}
