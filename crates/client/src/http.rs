//! HTTP 调用核心
//!
//! 每个服务一个 [`HttpCore`]，共享同一个 reqwest 连接池。
//! 非 2xx 响应不会被当成传输错误，而是原样交给调用方断言。

use std::time::{Duration, Instant};

use kado_shared::config::HttpConfig;
use kado_shared::observability::metrics::record_http_request;
use kado_shared::retry::{RetryPolicy, retry_with_policy};
use kado_shared::{KadoError, Result};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::envelope::ApiEnvelope;

/// 构建共享的 HTTP 客户端
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()?;
    Ok(client)
}

/// 待发送的请求
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    token: Option<String>,
    body: Option<Value>,
    query: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
    retry: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
            retry: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// 附加 Bearer 令牌
    pub fn bearer(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// 可选令牌
    pub fn maybe_bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer(token),
            None => self,
        }
    }

    /// JSON 请求体
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| KadoError::Internal(format!("序列化请求体失败: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// 瞬时故障时按重试策略重发
    pub fn retrying(mut self) -> Self {
        self.retry = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// 原始响应
///
/// 保留状态码与完整响应体，便于对业务拒绝做关键字断言。
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub service: &'static str,
    pub status: u16,
    /// 非 JSON 响应时为 `Value::Null`
    pub body: Value,
    pub text: String,
}

impl RawResponse {
    /// 2xx 且信封未声明失败
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
            && self.body.get("success").and_then(Value::as_bool) != Some(false)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// `data` 字段
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data").filter(|v| !v.is_null())
    }

    /// 顶层 `message`
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// 最能说明失败原因的一段文字
    pub fn error_message(&self) -> String {
        self.body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| self.message())
            .map(str::to_string)
            .unwrap_or_else(|| self.text.clone())
    }

    /// 错误码
    pub fn error_code(&self) -> Option<&str> {
        self.body.pointer("/error/code").and_then(Value::as_str)
    }

    /// 汇总所有说明文字并转为小写，用于关键字匹配
    ///
    /// 重复支付等场景的提示可能出现在 `data.message` 中。
    pub fn combined_message(&self) -> String {
        let parts = [
            self.message(),
            self.body.pointer("/error/message").and_then(Value::as_str),
            self.error_code(),
            self.body.pointer("/data/message").and_then(Value::as_str),
        ];
        let mut combined: Vec<&str> = parts.into_iter().flatten().collect();
        if combined.is_empty() && self.body.is_null() {
            combined.push(&self.text);
        }
        combined.join(" | ").to_lowercase()
    }

    /// 解析完整信封
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<ApiEnvelope<T>> {
        serde_json::from_value(self.body.clone()).map_err(|source| KadoError::Decode {
            context: format!("{} 响应信封", self.service),
            source,
        })
    }

    /// 解析 `data` 字段
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.data().cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|source| KadoError::Decode {
            context: format!("{} data 字段", self.service),
            source,
        })
    }

    /// 要求指定状态码和成功信封后解析 `data`
    pub fn expect_data<T: DeserializeOwned>(&self, expected: u16) -> Result<T> {
        if !self.is_success() {
            return Err(self.to_error());
        }
        if self.status != expected {
            return Err(KadoError::UnexpectedStatus {
                expected,
                actual: self.status,
                body: self.text.clone(),
            });
        }
        self.decode_data()
    }

    /// 只要求成功，不关心具体 2xx 状态码
    pub fn expect_success<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_success() {
            return Err(self.to_error());
        }
        self.decode_data()
    }

    /// 转为平台错误
    pub fn to_error(&self) -> KadoError {
        KadoError::Api {
            status: self.status,
            code: self.error_code().unwrap_or("UNKNOWN").to_string(),
            message: self.error_message(),
        }
    }

    /// 5xx 视为服务不可用
    pub fn unavailable_on_5xx(self) -> Result<Self> {
        if self.is_server_error() {
            return Err(KadoError::unavailable(
                self.service,
                format!("HTTP {}: {}", self.status, self.error_message()),
            ));
        }
        Ok(self)
    }
}

/// 连接类错误视为服务不可用，其余原样返回
pub fn unreachable_as_unavailable(service: &'static str, err: KadoError) -> KadoError {
    match &err {
        KadoError::Http(inner) if inner.is_connect() || inner.is_timeout() => {
            KadoError::unavailable(service, inner.to_string())
        }
        KadoError::Api { status, message, .. } if *status >= 500 => {
            KadoError::unavailable(service, format!("HTTP {}: {}", status, message))
        }
        _ => err,
    }
}

/// 单个服务的 HTTP 调用核心
#[derive(Debug, Clone)]
pub struct HttpCore {
    client: Client,
    service: &'static str,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpCore {
    pub fn new(client: Client, service: &'static str, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            client,
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送请求，标记了重试的请求在瞬时故障时按策略重发
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        if !request.retry {
            return self.execute(&request).await;
        }

        let operation = format!("{} {}", request.method, request.path);
        retry_with_policy(&self.retry, &operation, KadoError::is_retryable, || async {
            let raw = self.execute(&request).await?;
            if matches!(raw.status, 502..=504) {
                return Err(raw.to_error());
            }
            Ok(raw)
        })
        .await
    }

    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        let started = Instant::now();
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        let elapsed = started.elapsed();
        record_http_request(
            self.service,
            request.method.as_str(),
            status,
            elapsed.as_secs_f64(),
        );
        debug!(
            service = self.service,
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "平台请求完成"
        );

        Ok(RawResponse {
            service: self.service,
            status,
            body,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: Value) -> RawResponse {
        RawResponse {
            service: "order",
            status,
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn test_success_requires_envelope_flag() {
        assert!(raw(201, json!({"success": true, "data": {}})).is_success());
        assert!(raw(200, json!({"data": 1})).is_success());
        assert!(!raw(200, json!({"success": false})).is_success());
        assert!(!raw(400, json!({"success": true})).is_success());
    }

    #[test]
    fn test_error_message_prefers_error_body() {
        let response = raw(
            400,
            json!({
                "success": false,
                "message": "Bad request",
                "error": {"code": "PAYMENT_ERROR", "message": "Payment amount does not match"}
            }),
        );
        assert_eq!(response.error_message(), "Payment amount does not match");
        assert!(response.combined_message().contains("amount does not match"));
        assert!(response.combined_message().contains("payment_error"));

        match response.to_error() {
            KadoError::Api { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code, "PAYMENT_ERROR");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_combined_message_falls_back_to_text() {
        let response = RawResponse {
            service: "redemption",
            status: 400,
            body: Value::Null,
            text: "Voucher ALREADY used".to_string(),
        };
        assert_eq!(response.combined_message(), "voucher already used");
    }

    #[test]
    fn test_expect_data_checks_status() {
        let response = raw(200, json!({"success": true, "data": {"id": 1}}));
        let err = response.expect_data::<Value>(201).unwrap_err();
        assert!(matches!(err, KadoError::UnexpectedStatus { expected: 201, actual: 200, .. }));

        let value: Value = response.expect_success().unwrap();
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn test_unavailable_on_5xx() {
        let err = raw(503, json!({"message": "down"})).unavailable_on_5xx().unwrap_err();
        assert!(matches!(err, KadoError::Unavailable { .. }));
        assert!(raw(400, json!({})).unavailable_on_5xx().is_ok());
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::post("/api/v1/orders")
            .bearer("token")
            .query("reason", "incomplete docs")
            .header("X-Internal-Secret", "secret")
            .retrying();
        assert_eq!(request.path(), "/api/v1/orders");
        assert!(request.retry);
        assert_eq!(request.token.as_deref(), Some("token"));
        assert_eq!(request.query.len(), 1);
    }
}
