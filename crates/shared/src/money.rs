//! 金额工具
//!
//! 金额一律使用 `Decimal`，舍入规则与平台一致：保留两位小数，四舍五入（HALF_UP）。

use rust_decimal::{Decimal, RoundingStrategy};

/// 平台佣金比例 8%
pub const PLATFORM_COMMISSION_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// 单笔订单的金额容差
pub const ORDER_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// 多笔订单汇总的金额容差
pub const AGGREGATE_TOLERANCE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// 保留两位小数，HALF_UP
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 两个金额之差是否在容差内
pub fn approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
    (actual - expected).abs() <= tolerance
}

/// 按佣金比例计算平台手续费
pub fn platform_fee(total: Decimal) -> Decimal {
    round_money(total * PLATFORM_COMMISSION_RATE)
}

/// 商户实收金额
pub fn merchant_amount(total: Decimal) -> Decimal {
    round_money(total * (Decimal::ONE - PLATFORM_COMMISSION_RATE))
}

/// 以两位小数构造金额，如 `money(2500)` 即 25.00
pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
