use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 券商品状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherStatus {
    Draft,
    Active,
    Paused,
    Expired,
    Deleted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoucherRequest {
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub terms_and_conditions: String,
    #[serde(serialize_with = "super::decimals_as_floats")]
    pub denominations: Vec<Decimal>,
    pub stock_quantity: i32,
    /// LocalDateTime 格式：`YYYY-MM-DDTHH:MM:SS`
    pub valid_until: String,
    pub usage_instructions: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherDto {
    pub id: i64,
    #[serde(default)]
    pub merchant_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub denominations: Vec<Decimal>,
    pub status: VoucherStatus,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub total_sold: Option<i32>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}
