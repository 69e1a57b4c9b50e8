//! 营收拆分

use kado_client::dto::Role;
use kado_shared::money::{ORDER_TOLERANCE, approx_eq, merchant_amount, money, platform_fee};
use kado_shared::{KadoError, Result};

use crate::context::FlowContext;
use crate::model::ensure;
use crate::model::redemption::verify_redemption_accepted;
use crate::model::revenue::{RevenueAggregate, verify_order_split};
use crate::report::Verdict;

/// BF-CYCLE-01：购买 → 拆分校验 → 发券 → 核销
pub async fn complete_cycle(ctx: &FlowContext) -> Result<Verdict> {
    let (merchant, voucher) = ctx.merchant_with_voucher().await?;
    let denomination = ctx.first_denomination(&voucher)?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;

    let purchase = ctx.purchase(&consumer, voucher.id, denomination).await?;
    verify_order_split(&purchase.order)?;

    let entry = ctx.wait_for_voucher(&consumer, voucher.id).await?;
    let redemption = ctx.redeem(&merchant, &entry.voucher_code, denomination).await?;
    verify_redemption_accepted(&redemption)?;

    Ok(Verdict::Passed(vec![
        format!(
            "order {} split {:?}/{:?}",
            purchase.order.id, purchase.order.platform_fee, purchase.order.merchant_amount
        ),
        format!("redeemed {}", entry.voucher_code),
    ]))
}

/// BF-MONEY-01：最大面值订单的 8% / 92% 拆分
pub async fn single_order_split(ctx: &FlowContext) -> Result<Verdict> {
    let merchant = ctx.onboard_merchant().await?;
    let voucher = ctx
        .publish_voucher(
            &merchant,
            "Premium Voucher",
            vec![money(2500), money(5000), money(10000)],
            ctx.fixtures().stock_quantity,
        )
        .await?;
    let largest = voucher
        .denominations
        .iter()
        .max()
        .copied()
        .ok_or_else(|| KadoError::invariant(format!("券 {} 没有面值", voucher.id)))?;

    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    let order = ctx.purchase(&consumer, voucher.id, largest).await?.order;
    verify_order_split(&order)?;

    let (Some(fee), Some(merchant_share)) = (order.platform_fee, order.merchant_amount) else {
        return Err(KadoError::invariant(format!(
            "订单 {} 未返回 platformFee / merchantAmount",
            order.id
        )));
    };
    ensure(approx_eq(fee, platform_fee(largest), ORDER_TOLERANCE), || {
        format!("{} 的平台抽成应为 {}，实际 {}", largest, platform_fee(largest), fee)
    })?;
    ensure(fee + merchant_share == order.total_amount, || {
        format!(
            "订单 {} 拆分之和 {} 不等于总额 {}",
            order.id,
            fee + merchant_share,
            order.total_amount
        )
    })?;

    Ok(Verdict::passed_with(format!(
        "{} -> fee {} / merchant {} (expected {} / {})",
        largest,
        fee,
        merchant_share,
        platform_fee(largest),
        merchant_amount(largest)
    )))
}

/// BF-MONEY-04：十笔 25.00 订单汇总拆分
pub async fn aggregate_split(ctx: &FlowContext) -> Result<Verdict> {
    const ORDERS: usize = 10;
    let denomination = money(2500);

    let merchant = ctx.onboard_merchant().await?;
    let voucher = ctx
        .publish_voucher(&merchant, "Bulk Voucher", vec![denomination], 50)
        .await?;

    let mut aggregate = RevenueAggregate::default();
    for _ in 0..ORDERS {
        let consumer = ctx.register_actor(Role::Consumer, "bulk").await?;
        let purchase = ctx.purchase(&consumer, voucher.id, denomination).await?;
        aggregate.add(&purchase.order);
    }

    aggregate.verify(money(2000), money(23000))?;
    ensure(aggregate.total == money(25000), || {
        format!("{} 笔订单总额 {}，期望 250.00", aggregate.orders, aggregate.total)
    })?;
    Ok(Verdict::passed_with(format!(
        "{} orders: fee {} merchant {}",
        aggregate.orders, aggregate.platform_fee, aggregate.merchant_amount
    )))
}
