//! 请求/响应类型
//!
//! 字段名与平台 JSON 保持一致（camelCase），金额统一为 `Decimal`，
//! 发送时序列化为 JSON 数字。

mod auth;
mod merchant;
mod order;
mod payout;
mod redemption;
mod voucher;
mod wallet;

pub use auth::*;
pub use merchant::*;
pub use order::*;
pub use payout::*;
pub use redemption::*;
pub use voucher::*;
pub use wallet::*;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serializer;
use serde::ser::SerializeSeq;

/// 金额列表按 JSON 数字序列化
pub(crate) fn decimals_as_floats<S>(values: &[Decimal], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        let number = value
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom(format!("金额无法表示为数字: {}", value)))?;
        seq.serialize_element(&number)?;
    }
    seq.end()
}
