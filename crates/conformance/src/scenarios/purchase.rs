//! 正向购买流程

use kado_client::dto::Role;
use kado_shared::Result;
use tracing::info;

use crate::context::FlowContext;
use crate::model::ensure;
use crate::model::order::verify_payment_completed;
use crate::model::redemption::verify_redemption_accepted;
use crate::model::stock::StockModel;
use crate::report::Verdict;

/// CP-A01：入驻 → 发布 → 下单支付 → 钱包发券 → 商户核销
pub async fn full_purchase_flow(ctx: &FlowContext) -> Result<Verdict> {
    let (merchant, voucher) = ctx.merchant_with_voucher().await?;
    let denomination = ctx.first_denomination(&voucher)?;

    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    let purchase = ctx.purchase(&consumer, voucher.id, denomination).await?;
    verify_payment_completed(&purchase.payment)?;

    let entry = ctx.wait_for_voucher(&consumer, voucher.id).await?;
    ensure(!entry.voucher_code.is_empty(), || "钱包券没有券码".to_string())?;
    ensure(entry.denomination == Some(denomination), || {
        format!("钱包券面值 {:?} 与购买面值 {} 不符", entry.denomination, denomination)
    })?;

    let redemption = ctx.redeem(&merchant, &entry.voucher_code, denomination).await?;
    verify_redemption_accepted(&redemption)?;

    info!(order_id = purchase.order.id, voucher_code = %entry.voucher_code, "完整购买流程通过");
    Ok(Verdict::Passed(vec![
        format!("order {}", purchase.order.id),
        format!("wallet voucher {}", entry.voucher_code),
        format!("redemption {}", redemption.id),
    ]))
}

/// CP-A04：同一消费者购买同一商户的两张不同券，钱包中券码互不相同
pub async fn multiple_vouchers(ctx: &FlowContext) -> Result<Verdict> {
    let (merchant, first) = ctx.merchant_with_voucher().await?;
    let second = ctx.publish_default_voucher(&merchant).await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;

    let order_a = ctx
        .create_order(&consumer, first.id, ctx.first_denomination(&first)?)
        .await?;
    let order_b = ctx
        .create_order(&consumer, second.id, ctx.first_denomination(&second)?)
        .await?;
    verify_payment_completed(&ctx.pay_order(&consumer, &order_a).await?)?;
    verify_payment_completed(&ctx.pay_order(&consumer, &order_b).await?)?;

    let entry_a = ctx.wait_for_voucher(&consumer, first.id).await?;
    let entry_b = ctx.wait_for_voucher(&consumer, second.id).await?;
    ensure(entry_a.voucher_code != entry_b.voucher_code, || {
        format!("两张券的券码相同: {}", entry_a.voucher_code)
    })?;

    Ok(Verdict::Passed(vec![
        format!("{} -> {}", first.id, entry_a.voucher_code),
        format!("{} -> {}", second.id, entry_b.voucher_code),
    ]))
}

/// BF-PURCHASE-03：每个面值的订单总额都等于所选面值
pub async fn each_denomination(ctx: &FlowContext) -> Result<Verdict> {
    let (_, voucher) = ctx.merchant_with_voucher().await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    let denominations = if voucher.denominations.is_empty() {
        ctx.fixtures().denominations.clone()
    } else {
        voucher.denominations.clone()
    };

    let mut notes = Vec::with_capacity(denominations.len());
    for denomination in denominations {
        // create_order 内已校验总额等于面值
        let purchase = ctx.purchase(&consumer, voucher.id, denomination).await?;
        verify_payment_completed(&purchase.payment)?;
        notes.push(format!("{} -> order {}", denomination, purchase.order.id));
    }
    Ok(Verdict::Passed(notes))
}

/// BF-PURCHASE-04：使用 ABA 支付，订单与支付状态都变为完成
pub async fn aba_payment(ctx: &FlowContext) -> Result<Verdict> {
    let (_, voucher) = ctx.merchant_with_voucher().await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    let purchase = ctx
        .purchase(&consumer, voucher.id, ctx.first_denomination(&voucher)?)
        .await?;
    verify_payment_completed(&purchase.payment)?;

    let method = &ctx.fixtures().payment_method;
    if let Some(reported) = &purchase.payment.payment_method {
        ensure(reported.eq_ignore_ascii_case(method), || {
            format!("支付方式应为 {}，实际 {}", method, reported)
        })?;
    }
    Ok(Verdict::passed_with(format!(
        "order {} paid with {}",
        purchase.order.id, method
    )))
}

/// BF-CYCLE-02：十个消费者购买同一张券，库存随之扣减
pub async fn many_consumers(ctx: &FlowContext) -> Result<Verdict> {
    const CONSUMERS: i32 = 10;
    const STOCK: i32 = 20;

    let merchant = ctx.onboard_merchant().await?;
    let voucher = ctx
        .publish_voucher(
            &merchant,
            "Crowd Voucher",
            ctx.fixtures().denominations.clone(),
            STOCK,
        )
        .await?;
    let denomination = ctx.first_denomination(&voucher)?;
    let mut stock = StockModel::new(voucher.stock_quantity.unwrap_or(STOCK));

    for _ in 0..CONSUMERS {
        let consumer = ctx.register_actor(Role::Consumer, "crowd").await?;
        let purchase = ctx.purchase(&consumer, voucher.id, denomination).await?;
        verify_payment_completed(&purchase.payment)?;
        ensure(stock.admit(), || "库存模型提前耗尽".to_string())?;
    }

    let updated = ctx
        .platform
        .vouchers
        .get(Some(&merchant.actor.token), voucher.id)
        .await?;
    stock.verify_observed(updated.stock_quantity)?;

    Ok(Verdict::Passed(vec![
        format!("{} purchases completed", CONSUMERS),
        format!(
            "stock {:?} (model {})",
            updated.stock_quantity,
            stock.remaining()
        ),
    ]))
}
