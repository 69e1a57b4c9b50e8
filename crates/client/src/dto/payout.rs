use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSimulationRequest {
    /// `YYYY-MM-DD`
    pub week_ending: String,
    pub dry_run: bool,
}

/// 结算模拟结果
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSimulation {
    #[serde(default)]
    pub week_ending: Option<String>,
    #[serde(default)]
    pub payouts: Vec<PayoutDto>,
    #[serde(default)]
    pub hold_queue: Vec<PayoutHold>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub merchant_id: i64,
    #[serde(default)]
    pub payout_number: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutHold {
    pub merchant_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHoldRequest {
    pub merchant_id: i64,
    pub reason: String,
}
