//! 自定义断言宏和辅助函数
//!
//! 提供针对 Kado24 平台的专用断言功能。

use kado_client::dto::{OrderDto, OrderStatus, PaymentStatus, WalletEntry};
use rust_decimal::Decimal;

/// 执行已注册场景并断言没有失败
#[macro_export]
macro_rules! assert_scenario_ok {
    ($env:expr, $id:expr) => {{
        let result = $env.expect_scenario($id).await.unwrap();
        tracing::info!(
            scenario = $id,
            outcome = result.outcome.as_str(),
            notes = ?result.notes,
            "场景完成"
        );
        result
    }};
}

/// 断言金额在单笔订单容差（0.01）内相等
#[macro_export]
macro_rules! assert_money_eq {
    ($actual:expr, $expected:expr) => {
        let actual: rust_decimal::Decimal = $actual;
        let expected: rust_decimal::Decimal = $expected;
        assert!(
            kado_shared::money::approx_eq(actual, expected, kado_shared::money::ORDER_TOLERANCE),
            "金额应为 {}，实际为 {}",
            expected,
            actual
        );
    };
}

/// 断言订单仍为 PENDING/PENDING
pub fn assert_order_pending(order: &OrderDto) {
    assert_eq!(
        (order.order_status, order.payment_status),
        (OrderStatus::Pending, PaymentStatus::Pending),
        "订单 {} 应保持待支付",
        order.id
    );
}

/// 断言钱包中某张券的数量
pub fn assert_wallet_count(entries: &[WalletEntry], voucher_id: i64, expected: usize) {
    let count = entries
        .iter()
        .filter(|e| e.voucher_id == Some(voucher_id))
        .count();
    assert_eq!(
        count, expected,
        "钱包中券 {} 的数量应为 {}，实际为 {}",
        voucher_id, expected, count
    );
}

/// 断言余额
pub fn assert_balance(entry: &WalletEntry, expected: Decimal) {
    let balance = entry.balance().unwrap_or(Decimal::ZERO);
    assert_eq!(
        balance, expected,
        "券 {} 余额应为 {}，实际为 {}",
        entry.voucher_code, expected, balance
    );
}
