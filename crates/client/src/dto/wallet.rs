use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 钱包券状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletEntryStatus {
    Active,
    Used,
    Expired,
    Cancelled,
    Gifted,
    #[serde(other)]
    Unknown,
}

/// 钱包中的一张券
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletEntry {
    pub id: i64,
    pub voucher_code: String,
    #[serde(default)]
    pub voucher_id: Option<i64>,
    #[serde(default)]
    pub merchant_id: Option<i64>,
    #[serde(default)]
    pub denomination: Option<Decimal>,
    #[serde(default)]
    pub remaining_value: Option<Decimal>,
    pub status: WalletEntryStatus,
    #[serde(default)]
    pub is_gift: Option<bool>,
    #[serde(default)]
    pub gifted_to_user_id: Option<i64>,
    #[serde(default)]
    pub gift_message: Option<String>,
}

impl WalletEntry {
    /// 剩余面值，缺省时按面值计
    pub fn balance(&self) -> Option<Decimal> {
        self.remaining_value.or(self.denomination)
    }

    pub fn is_spent(&self) -> bool {
        self.status == WalletEntryStatus::Used
            || self.remaining_value.is_some_and(|v| v.is_zero())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRequest {
    pub recipient_user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_message: Option<String>,
}
