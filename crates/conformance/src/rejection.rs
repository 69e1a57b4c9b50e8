//! 业务拒绝识别
//!
//! 平台的拒绝文案并不统一，这里按关键字集合识别拒绝原因。
//! 业务拒绝必须是 4xx；出现 5xx 说明平台把可预期的输入错误处理成了故障。

use kado_client::RawResponse;
use kado_shared::{KadoError, Result};

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// 支付金额与订单金额不符
    AmountMismatch,
    /// 支付金额不足
    InsufficientPayment,
    /// 订单不处于待支付状态
    InvalidState,
    /// 库存耗尽
    StockExhausted,
    /// 邮箱已注册
    DuplicateEmail,
    /// 券已过期或不可售
    Expired,
    /// 券已核销
    AlreadyRedeemed,
    /// 核销金额超过余额
    InsufficientBalance,
    /// 重复支付
    DuplicatePayment,
}

impl RejectionKind {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::AmountMismatch => &[
                "amount does not match",
                "does not match order total",
                "amount mismatch",
            ],
            Self::InsufficientPayment => &[
                "amount does not match",
                "does not match order total",
                "amount mismatch",
                "insufficient payment",
                "insufficient amount",
            ],
            Self::InvalidState => &[
                "not in pending status",
                "not pending",
                "cannot be paid",
                "already cancelled",
                "order is cancelled",
            ],
            Self::StockExhausted => &[
                "stock",
                "sold out",
                "not available for purchase",
            ],
            Self::DuplicateEmail => &[
                "email already",
                "email is already",
                "already registered",
                "already exists",
                "duplicate email",
            ],
            Self::Expired => &[
                "expired",
                "not available for purchase",
                "no longer available",
            ],
            Self::AlreadyRedeemed => &[
                "already redeemed",
                "already used",
                "fully redeemed",
                "balance is zero",
                "no remaining",
            ],
            Self::InsufficientBalance => &[
                "insufficient balance",
                "exceeds",
                "remaining balance",
                "balance is zero",
                "not enough balance",
                "already redeemed",
            ],
            Self::DuplicatePayment => &[
                "already paid",
                "already completed",
                "payment already",
                "already confirmed",
                "duplicate payment",
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AmountMismatch => "amount mismatch",
            Self::InsufficientPayment => "insufficient payment",
            Self::InvalidState => "invalid order state",
            Self::StockExhausted => "stock exhausted",
            Self::DuplicateEmail => "duplicate email",
            Self::Expired => "expired voucher",
            Self::AlreadyRedeemed => "already redeemed",
            Self::InsufficientBalance => "insufficient balance",
            Self::DuplicatePayment => "duplicate payment",
        }
    }

    /// 文案中是否包含任一关键字（不区分大小写）
    pub fn matches(self, message: &str) -> bool {
        let lower = message.to_lowercase();
        self.keywords().iter().any(|k| lower.contains(k))
    }
}

/// 断言响应是指定原因的业务拒绝
pub fn expect_rejection(raw: &RawResponse, allowed: &[u16], kind: RejectionKind) -> Result<()> {
    if raw.is_server_error() {
        return Err(KadoError::invariant(format!(
            "期望 {} 拒绝，平台返回服务端错误 {}: {}",
            kind.label(),
            raw.status,
            raw.error_message()
        )));
    }
    if raw.is_success() {
        return Err(KadoError::invariant(format!(
            "期望 {} 拒绝，请求却成功 ({})",
            kind.label(),
            raw.status
        )));
    }
    if !allowed.contains(&raw.status) {
        return Err(KadoError::UnexpectedStatus {
            expected: allowed.first().copied().unwrap_or(400),
            actual: raw.status,
            body: raw.text.clone(),
        });
    }
    let message = raw.combined_message();
    if !kind.matches(&message) {
        return Err(KadoError::invariant(format!(
            "拒绝原因不可识别，期望 {}，实际: {}",
            kind.label(),
            message
        )));
    }
    Ok(())
}
