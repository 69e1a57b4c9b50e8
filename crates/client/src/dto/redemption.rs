use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 核销状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionStatus {
    Pending,
    Confirmed,
    Completed,
    Disputed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl RedemptionStatus {
    /// 核销已被受理
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Completed)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub voucher_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionDto {
    pub id: i64,
    #[serde(default)]
    pub voucher_code: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub status: RedemptionStatus,
    #[serde(default)]
    pub redeemed_at: Option<String>,
}
