//! 营收拆分校验：平台抽成 8%，HALF_UP 保留两位

use kado_client::dto::OrderDto;
use kado_shared::Result;
use kado_shared::money::{
    AGGREGATE_TOLERANCE, ORDER_TOLERANCE, approx_eq, merchant_amount, platform_fee,
};
use rust_decimal::Decimal;

use super::ensure;

/// 单笔订单：platformFee 与 merchantAmount 与 8% 拆分一致，且两者之和等于总额
pub fn verify_order_split(order: &OrderDto) -> Result<()> {
    let total = order.total_amount;
    let expected_fee = platform_fee(total);
    let expected_merchant = merchant_amount(total);

    if let Some(fee) = order.platform_fee {
        ensure(approx_eq(fee, expected_fee, ORDER_TOLERANCE), || {
            format!(
                "订单 {} platformFee 应为 {}，实际 {}",
                order.id, expected_fee, fee
            )
        })?;
    }
    if let Some(merchant) = order.merchant_amount {
        ensure(approx_eq(merchant, expected_merchant, ORDER_TOLERANCE), || {
            format!(
                "订单 {} merchantAmount 应为 {}，实际 {}",
                order.id, expected_merchant, merchant
            )
        })?;
    }
    if let (Some(fee), Some(merchant)) = (order.platform_fee, order.merchant_amount) {
        ensure(approx_eq(fee + merchant, total, ORDER_TOLERANCE), || {
            format!(
                "订单 {} 拆分之和 {} 不等于总额 {}",
                order.id,
                fee + merchant,
                total
            )
        })?;
    }
    Ok(())
}

/// 多笔订单的汇总
#[derive(Debug, Clone, Default)]
pub struct RevenueAggregate {
    pub orders: usize,
    pub total: Decimal,
    pub platform_fee: Decimal,
    pub merchant_amount: Decimal,
}

impl RevenueAggregate {
    pub fn add(&mut self, order: &OrderDto) {
        self.orders += 1;
        self.total += order.total_amount;
        self.platform_fee += order
            .platform_fee
            .unwrap_or_else(|| platform_fee(order.total_amount));
        self.merchant_amount += order
            .merchant_amount
            .unwrap_or_else(|| merchant_amount(order.total_amount));
    }

    /// 与期望值比较（容差 ±0.10）
    pub fn verify(&self, expected_fee: Decimal, expected_merchant: Decimal) -> Result<()> {
        ensure(approx_eq(self.platform_fee, expected_fee, AGGREGATE_TOLERANCE), || {
            format!(
                "{} 笔订单平台抽成合计 {}，期望 {}",
                self.orders, self.platform_fee, expected_fee
            )
        })?;
        ensure(
            approx_eq(self.merchant_amount, expected_merchant, AGGREGATE_TOLERANCE),
            || {
                format!(
                    "{} 笔订单商户所得合计 {}，期望 {}",
                    self.orders, self.merchant_amount, expected_merchant
                )
            },
        )
    }

    /// 按当前总额推算期望值并比较
    pub fn verify_against_total(&self) -> Result<()> {
        self.verify(platform_fee(self.total), merchant_amount(self.total))
    }
}
