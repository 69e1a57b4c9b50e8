//! Kado24 平台 REST 客户端
//!
//! 封装认证、商户、券、订单/支付、钱包、核销、结算各服务的 HTTP 调用。
//! 每个接口同时提供强类型版本与返回 [`RawResponse`] 的 `*_raw` 版本，
//! 后者用于对业务拒绝做断言。

pub mod dto;
pub mod envelope;
pub mod http;
pub mod platform;
pub mod services;

pub use envelope::{ApiEnvelope, ApiErrorBody, Listing, Page};
pub use http::{ApiRequest, HttpCore, RawResponse};
pub use platform::Platform;
pub use services::*;
