//! 钱包余额与转赠
//!
//! `remainingValue` 只能单调不增且不能为负。

use kado_client::dto::{WalletEntry, WalletEntryStatus};
use kado_shared::Result;
use rust_decimal::Decimal;

use super::ensure;

/// 单张券的余额跟踪器
#[derive(Debug, Clone)]
pub struct BalanceTracker {
    voucher_code: String,
    history: Vec<Decimal>,
}

impl BalanceTracker {
    pub fn new(entry: &WalletEntry) -> Result<Self> {
        let mut tracker = Self {
            voucher_code: entry.voucher_code.clone(),
            history: Vec::new(),
        };
        tracker.observe(entry)?;
        Ok(tracker)
    }

    pub fn current(&self) -> Decimal {
        self.history.last().copied().unwrap_or(Decimal::ZERO)
    }

    /// 记录一次观测，校验单调性
    pub fn observe(&mut self, entry: &WalletEntry) -> Result<Decimal> {
        ensure(entry.voucher_code == self.voucher_code, || {
            format!(
                "跟踪的券码 {} 与观测到的 {} 不符",
                self.voucher_code, entry.voucher_code
            )
        })?;
        let balance = if entry.status == WalletEntryStatus::Used {
            entry.remaining_value.unwrap_or(Decimal::ZERO)
        } else {
            entry.balance().unwrap_or(Decimal::ZERO)
        };
        ensure(balance >= Decimal::ZERO, || {
            format!("券 {} 余额为负: {}", self.voucher_code, balance)
        })?;
        if let Some(previous) = self.history.last() {
            ensure(balance <= *previous, || {
                format!(
                    "券 {} 余额回升: {} -> {}",
                    self.voucher_code, previous, balance
                )
            })?;
        }
        self.history.push(balance);
        Ok(balance)
    }

    /// 核销 `amount` 后预期的余额
    pub fn expect_after_redemption(&self, amount: Decimal) -> Result<Decimal> {
        let current = self.current();
        ensure(amount <= current, || {
            format!("核销金额 {} 超过余额 {}", amount, current)
        })?;
        Ok(current - amount)
    }

    /// 核销后观测：余额必须恰好等于预期
    pub fn verify_redeemed(&mut self, entry: &WalletEntry, amount: Decimal) -> Result<()> {
        let expected = self.expect_after_redemption(amount)?;
        let actual = self.observe(entry)?;
        ensure(actual == expected, || {
            format!(
                "券 {} 核销 {} 后余额应为 {}，实际 {}",
                self.voucher_code, amount, expected, actual
            )
        })
    }
}

/// 转赠：券从发送方钱包中消失，接收方持有同券码同面值且 giftedToUserId 指向接收方
pub fn verify_gift_transfer(
    original: &WalletEntry,
    sender_after: &[WalletEntry],
    recipient_entries: &[WalletEntry],
    recipient_id: i64,
) -> Result<()> {
    ensure(
        sender_after
            .iter()
            .all(|e| e.voucher_code != original.voucher_code),
        || {
            format!(
                "转赠后发送方钱包中仍列出券 {}",
                original.voucher_code
            )
        },
    )?;

    let received = recipient_entries
        .iter()
        .find(|e| e.voucher_code == original.voucher_code);
    let Some(received) = received else {
        return Err(kado_shared::KadoError::invariant(format!(
            "接收方钱包中没有券 {}",
            original.voucher_code
        )));
    };
    ensure(received.denomination == original.denomination, || {
        format!(
            "转赠后面值变化: {:?} -> {:?}",
            original.denomination, received.denomination
        )
    })?;
    ensure(received.gifted_to_user_id == Some(recipient_id), || {
        format!(
            "券 {} 的 giftedToUserId 为 {:?}，期望 {}",
            received.voucher_code, received.gifted_to_user_id, recipient_id
        )
    })?;
    Ok(())
}
