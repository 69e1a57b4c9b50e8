//! 测试数据构造
//!
//! 所有标识都带随机后缀，保证重复运行互不冲突。

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use kado_client::dto::{
    CreateOrderRequest, CreateVoucherRequest, MerchantRegistrationRequest, RedeemRequest,
    RegisterRequest, Role,
};
use kado_shared::config::FixtureConfig;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

/// 8 位十六进制随机后缀
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// 柬埔寨手机号：`+8551` 加 8 位数字
pub fn phone_number() -> String {
    let digits: u32 = rand::rng().random_range(0..100_000_000);
    format!("+8551{:08}", digits)
}

pub fn email(prefix: &str) -> String {
    format!("{}-{}@autotest.kado24", prefix, unique_suffix())
}

/// 满足平台密码强度要求的随机密码
pub fn strong_password() -> String {
    let mut rng = rand::rng();
    let number: u32 = rng.random_range(100..1000);
    let tail: u8 = rng.random();
    format!("StrongP@ss{}{:02x}", number, tail)
}

pub fn register_request(role: Role, prefix: &str) -> RegisterRequest {
    let name: String = Name().fake();
    RegisterRequest {
        full_name: format!("{} {}", name, prefix),
        phone_number: phone_number(),
        email: email(prefix),
        password: strong_password(),
        role,
    }
}

/// 商户入驻资料，联系邮箱与账号邮箱一致
pub fn merchant_profile(contact_email: &str) -> MerchantRegistrationRequest {
    let company: String = CompanyName().fake();
    let suffix = unique_suffix();
    let business_name = format!("{} {}", company, &suffix[..4]);
    let tax_number: u16 = rand::rng().random_range(1000..10000);
    MerchantRegistrationRequest {
        business_license: format!("LIC-{}", &suffix[..6].to_uppercase()),
        tax_id: format!("TAX-{}", tax_number),
        phone_number: phone_number(),
        email: contact_email.to_string(),
        description: format!("{} automated conformance merchant", business_name),
        address_line1: "Street 240".to_string(),
        city: "Phnom Penh".to_string(),
        province: "Phnom Penh".to_string(),
        bank_name: "ABA Bank".to_string(),
        bank_account_number: format!("{:09}", rand::rng().random_range(0..1_000_000_000u32)),
        bank_account_name: business_name.clone(),
        business_type: "Cafe".to_string(),
        business_name,
    }
}

/// LocalDateTime 格式
pub fn local_date_time(days_from_now: i64) -> String {
    (Utc::now() + Duration::days(days_from_now))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

pub fn voucher_request(
    config: &FixtureConfig,
    title: &str,
    denominations: Vec<Decimal>,
    stock_quantity: i32,
) -> CreateVoucherRequest {
    CreateVoucherRequest {
        category_id: config.category_id,
        title: format!("{} {}", title, unique_suffix()),
        description: format!("{} issued by the conformance suite", title),
        terms_and_conditions: "Valid at participating outlets. Not exchangeable for cash.".to_string(),
        denominations,
        stock_quantity,
        valid_until: local_date_time(config.validity_days),
        usage_instructions: "Show the voucher code at the counter.".to_string(),
    }
}

pub fn order_request(voucher_id: i64, denomination: Decimal) -> CreateOrderRequest {
    CreateOrderRequest {
        voucher_id,
        denomination,
        quantity: 1,
        customer_notes: None,
    }
}

pub fn redeem_request(config: &FixtureConfig, voucher_code: &str, amount: Decimal) -> RedeemRequest {
    RedeemRequest {
        voucher_code: voucher_code.to_string(),
        amount,
        location: config.redemption_location.clone(),
        pin_code: None,
    }
}
