use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 商户审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRegistrationRequest {
    pub business_name: String,
    pub business_type: String,
    pub business_license: String,
    pub tax_id: String,
    pub phone_number: String,
    pub email: String,
    pub description: String,
    pub address_line1: String,
    pub city: String,
    pub province: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub bank_account_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuspendMerchantRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDto {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub business_name: String,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub business_license: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub total_revenue: Option<Decimal>,
}
