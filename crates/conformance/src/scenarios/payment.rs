//! 支付负向场景与并发
//!
//! 每次支付尝试都先由 [`OrderModel`] 预测结果，再与平台实际响应比对。

use futures::future::join_all;
use kado_client::dto::{OrderDto, Role, VoucherDto};
use kado_shared::money::money;
use kado_shared::{KadoError, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::context::{Actor, FlowContext};
use crate::model::ensure;
use crate::model::order::{
    OrderModel, OrderState, PaymentExpectation, verify_duplicate_payment, verify_new_order,
};
use crate::model::stock::verify_last_unit_race;
use crate::rejection::{RejectionKind, expect_rejection};
use crate::report::Verdict;

/// 重复支付的并发数
const DUPLICATE_PAYERS: usize = 3;

async fn pending_order(ctx: &FlowContext) -> Result<(Actor, VoucherDto, OrderDto)> {
    let (_, voucher) = ctx.merchant_with_voucher().await?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    let order = ctx
        .create_order(&consumer, voucher.id, ctx.first_denomination(&voucher)?)
        .await?;
    Ok((consumer, voucher, order))
}

/// 重新读取订单，确认仍处于待支付
async fn verify_still_pending(ctx: &FlowContext, consumer: &Actor, model: &OrderModel) -> Result<()> {
    let observed = ctx.platform.orders.get(&consumer.token, model.order_id).await?;
    model.verify_observed(&observed)?;
    ensure(model.state == OrderState::Pending, || {
        format!("订单 {} 模型状态应为待支付", model.order_id)
    })
}

/// 支付失败后钱包中不应出现该券
async fn verify_nothing_issued(ctx: &FlowContext, consumer: &Actor, voucher_id: i64) -> Result<()> {
    let entries = ctx.platform.wallet.list(&consumer.token).await?;
    ensure(!entries.iter().any(|e| e.voucher_id == Some(voucher_id)), || {
        format!("支付失败后钱包中出现了券 {}", voucher_id)
    })
}

/// 偏离总额的支付金额：默认少付 1.00，总额不足时改为多付
fn mismatched_amount(total: Decimal) -> Decimal {
    let under = total - Decimal::ONE;
    if under > Decimal::ZERO {
        under
    } else {
        total + Decimal::ONE
    }
}

/// 明显不足的支付金额：少付 5.00，不足时付 0.01
fn insufficient_amount_for(total: Decimal) -> Decimal {
    let under = total - money(500);
    if under > Decimal::ZERO { under } else { money(1) }
}

/// CP-N01：金额不符被 400 拒绝，订单保持 PENDING/PENDING，钱包无券
pub async fn amount_mismatch(ctx: &FlowContext) -> Result<Verdict> {
    let (consumer, voucher, order) = pending_order(ctx).await?;
    let mut model = OrderModel::from_order(&order);

    let amount = mismatched_amount(order.total_amount);
    let expectation = model.expect_payment(amount);
    ensure(expectation == PaymentExpectation::RejectAmountMismatch, || {
        format!("金额 {} 不应被预测为 {:?}", amount, expectation)
    })?;
    let raw = ctx.pay_once(&consumer, order.id, amount).await?;
    model.apply_payment(expectation, &raw)?;

    verify_still_pending(ctx, &consumer, &model).await?;
    verify_nothing_issued(ctx, &consumer, voucher.id).await?;

    Ok(Verdict::passed_with(format!(
        "paid {} against total {}: {}",
        amount,
        order.total_amount,
        raw.error_message()
    )))
}

/// BF-PURCHASE-07：金额明显不足被拒绝
pub async fn insufficient_amount(ctx: &FlowContext) -> Result<Verdict> {
    let (consumer, _, order) = pending_order(ctx).await?;
    let model = OrderModel::from_order(&order);

    let amount = insufficient_amount_for(order.total_amount);
    let raw = ctx.pay_once(&consumer, order.id, amount).await?;
    expect_rejection(&raw, &[400], RejectionKind::InsufficientPayment)?;
    verify_still_pending(ctx, &consumer, &model).await?;

    Ok(Verdict::passed_with(format!(
        "{} rejected for total {}",
        amount, order.total_amount
    )))
}

/// BF-CYCLE-04：支付失败时不发券
pub async fn failed_payment_issues_nothing(ctx: &FlowContext) -> Result<Verdict> {
    let (consumer, voucher, order) = pending_order(ctx).await?;
    let mut model = OrderModel::from_order(&order);

    let amount = mismatched_amount(order.total_amount);
    let raw = ctx.pay_once(&consumer, order.id, amount).await?;
    model.apply_payment(model.expect_payment(amount), &raw)?;
    verify_still_pending(ctx, &consumer, &model).await?;

    let mut notes = vec![format!("order {} stays pending", order.id)];
    match verify_nothing_issued(ctx, &consumer, voucher.id).await {
        Ok(()) => notes.push("wallet holds no voucher".to_string()),
        Err(e @ KadoError::Unavailable { .. }) => {
            warn!(error = %e, "钱包不可用，跳过发券检查");
            notes.push(format!("wallet check skipped: {}", e));
        }
        Err(e) => return Err(e),
    }
    Ok(Verdict::Passed(notes))
}

/// CP-N02：取消后的订单不能再支付
pub async fn cancel_then_pay(ctx: &FlowContext) -> Result<Verdict> {
    let (consumer, _, order) = pending_order(ctx).await?;
    let mut model = OrderModel::from_order(&order);

    let cancel = ctx.platform.orders.cancel_raw(&consumer.token, order.id).await?;
    model.apply_cancel(&cancel)?;
    let observed = ctx.platform.orders.get(&consumer.token, order.id).await?;
    model.verify_observed(&observed)?;

    let expectation = model.expect_payment(order.total_amount);
    let raw = ctx.pay_once(&consumer, order.id, order.total_amount).await?;
    model.apply_payment(expectation, &raw)?;

    let observed = ctx.platform.orders.get(&consumer.token, order.id).await?;
    model.verify_observed(&observed)?;
    Ok(Verdict::passed_with(format!(
        "cancelled order {} refused payment with {}",
        order.id, raw.status
    )))
}

/// CP-N03：同一订单并发重复支付，只发一张券
pub async fn double_spend(ctx: &FlowContext) -> Result<Verdict> {
    let (consumer, voucher, order) = pending_order(ctx).await?;
    let mut model = OrderModel::from_order(&order);

    let first = ctx.pay_once(&consumer, order.id, order.total_amount).await?;
    model.apply_payment(PaymentExpectation::Complete, &first)?;

    let replays = join_all(
        (0..DUPLICATE_PAYERS).map(|_| ctx.pay_once(&consumer, order.id, order.total_amount)),
    )
    .await;
    let mut statuses = Vec::with_capacity(DUPLICATE_PAYERS);
    for replay in replays {
        let raw = replay?;
        verify_duplicate_payment(&raw)?;
        statuses.push(raw.status);
    }

    let observed = ctx.platform.orders.get(&consumer.token, order.id).await?;
    model.verify_observed(&observed)?;

    ctx.wait_for_voucher(&consumer, voucher.id).await?;
    let issued = ctx
        .platform
        .wallet
        .list(&consumer.token)
        .await?
        .into_iter()
        .filter(|e| e.voucher_id == Some(voucher.id))
        .count();
    ensure(issued == 1, || {
        format!("订单 {} 重复支付后钱包中有 {} 张券", order.id, issued)
    })?;

    info!(order_id = order.id, ?statuses, "重复支付只发放一张券");
    Ok(Verdict::Passed(vec![
        format!("duplicate payments answered {:?}", statuses),
        "exactly one wallet voucher".to_string(),
    ]))
}

/// 发布库存为 1 的单面值券
async fn last_unit_voucher(ctx: &FlowContext) -> Result<VoucherDto> {
    let merchant = ctx.onboard_merchant().await?;
    let denomination = ctx
        .fixtures()
        .denominations
        .first()
        .copied()
        .ok_or_else(|| KadoError::Validation("未配置券面值".to_string()))?;
    ctx.publish_voucher(&merchant, "Last Unit", vec![denomination], 1)
        .await
}

/// CP-N05：库存为 1 时第二位买家被拒绝
pub async fn last_unit_sequential(ctx: &FlowContext) -> Result<Verdict> {
    let voucher = last_unit_voucher(ctx).await?;
    let denomination = ctx.first_denomination(&voucher)?;

    let buyer = ctx.register_actor(Role::Consumer, "first-buyer").await?;
    ctx.purchase(&buyer, voucher.id, denomination).await?;

    let late = ctx.register_actor(Role::Consumer, "late-buyer").await?;
    let request = crate::fixtures::order_request(voucher.id, denomination);
    let created = ctx.platform.orders.create_raw(&late.token, &request).await?;
    if !created.is_success() {
        expect_rejection(&created, &[400, 409], RejectionKind::StockExhausted)?;
        return Ok(Verdict::passed_with(format!(
            "order creation refused: {}",
            created.error_message()
        )));
    }

    let order: OrderDto = created.decode_data()?;
    verify_new_order(&order, denomination)?;
    let raw = ctx.pay_once(&late, order.id, order.total_amount).await?;
    expect_rejection(&raw, &[400, 409], RejectionKind::StockExhausted)?;

    let observed = ctx.platform.orders.get(&late.token, order.id).await?;
    ensure(!observed.is_paid(), || {
        format!("库存耗尽后订单 {} 仍被支付", order.id)
    })?;
    Ok(Verdict::passed_with(format!(
        "payment refused: {}",
        raw.error_message()
    )))
}

/// CP-N06：两位买家并发争抢最后一件库存，恰好一人成功
pub async fn last_unit_race(ctx: &FlowContext) -> Result<Verdict> {
    let voucher = last_unit_voucher(ctx).await?;
    let denomination = ctx.first_denomination(&voucher)?;

    let alice = ctx.register_actor(Role::Consumer, "racer-a").await?;
    let bob = ctx.register_actor(Role::Consumer, "racer-b").await?;
    let first = ctx.create_order(&alice, voucher.id, denomination).await?;

    let request = crate::fixtures::order_request(voucher.id, denomination);
    let created = ctx.platform.orders.create_raw(&bob.token, &request).await?;
    if !created.is_success() {
        // 下单即占用库存，竞争在下单阶段已分出胜负
        expect_rejection(&created, &[400, 409], RejectionKind::StockExhausted)?;
        ctx.pay_order(&alice, &first).await?;
        return Ok(Verdict::passed_with(
            "stock reserved at order creation".to_string(),
        ));
    }
    let second: OrderDto = created.decode_data()?;
    verify_new_order(&second, denomination)?;

    let contenders = [(&alice, &first), (&bob, &second)];
    let responses = join_all(
        contenders
            .iter()
            .map(|(buyer, order)| ctx.pay_once(buyer, order.id, order.total_amount)),
    )
    .await
    .into_iter()
    .collect::<Result<Vec<_>>>()?;

    let verdict = verify_last_unit_race(&responses)?;
    for &loser in &verdict.losers {
        let (buyer, order) = contenders[loser];
        let observed = ctx.platform.orders.get(&buyer.token, order.id).await?;
        ensure(!observed.is_paid(), || {
            format!("竞争失败的订单 {} 仍被支付", order.id)
        })?;
    }

    let (winner, winning_order) = contenders[verdict.winner];
    Ok(Verdict::passed_with(format!(
        "consumer {} won with order {}",
        winner.id(),
        winning_order.id
    )))
}

/// CP-N04：过期券不可购买（需要预置过期券）
pub async fn expired_voucher(ctx: &FlowContext) -> Result<Verdict> {
    let Some(voucher_id) = ctx.fixtures().expired_voucher_id else {
        return Ok(Verdict::Skipped(
            "no expired voucher fixture configured".to_string(),
        ));
    };
    const ALLOWED: &[u16] = &[400, 404, 409, 422];

    let voucher = ctx.platform.vouchers.get(None, voucher_id).await?;
    let denomination = ctx.first_denomination(&voucher)?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;

    let request = crate::fixtures::order_request(voucher_id, denomination);
    let created = ctx.platform.orders.create_raw(&consumer.token, &request).await?;
    if !created.is_success() {
        expect_rejection(&created, ALLOWED, RejectionKind::Expired)?;
        return Ok(Verdict::passed_with(format!(
            "order refused with {}",
            created.status
        )));
    }

    let order: OrderDto = created.decode_data()?;
    let raw = ctx.pay_once(&consumer, order.id, order.total_amount).await?;
    expect_rejection(&raw, &[400], RejectionKind::Expired)?;
    Ok(Verdict::passed_with(format!(
        "payment refused with {}",
        raw.status
    )))
}
