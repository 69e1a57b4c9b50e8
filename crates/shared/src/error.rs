//! 统一错误处理模块
//!
//! 定义一致性测试套件共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 所有错误最终归入三类：业务拒绝、基础设施不可用、瞬时故障（见 [`ErrorClass`]）。

use std::time::Duration;

use thiserror::Error;

/// 套件错误类型
#[derive(Debug, Error)]
pub enum KadoError {
    // ==================== 传输错误 ====================
    #[error("HTTP 传输错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("响应解析失败: {context} - {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ==================== 平台响应错误 ====================
    #[error("平台返回错误 {status}: [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("状态码不符: 期望 {expected}, 实际 {actual}, 响应: {body}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    // ==================== 基础设施错误 ====================
    #[error("服务不可用: {service} - {reason}")]
    Unavailable { service: String, reason: String },

    #[error("等待超时: {operation} (已等待 {waited:?})")]
    Timeout { operation: String, waited: Duration },

    // ==================== 校验错误 ====================
    #[error("不变量被破坏: {0}")]
    Invariant(String),

    #[error("参数验证失败: {0}")]
    Validation(String),

    // ==================== 通用错误 ====================
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, KadoError>;

/// 错误分类
///
/// 决定一个失败在报告中如何呈现：业务拒绝是可断言的预期结果，
/// 基础设施不可用计为跳过，瞬时故障先重试再上报。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 400/409 等带可识别关键字的业务拒绝
    DomainRejection,
    /// 服务不可达或返回非预期 5xx
    Unavailable,
    /// 网络抖动、网关超时，可重试
    Transient,
    /// 最终一致性等待超过截止时间
    Timeout,
    /// 观测结果违反领域状态机
    Violation,
    /// 其他（配置、解析、内部错误）
    Other,
}

impl KadoError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "HTTP_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Unavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Invariant(_) => "INVARIANT_VIOLATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 平台返回的 HTTP 状态码（传输层错误时为空）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 是否为可重试错误
    ///
    /// 连接失败、请求超时以及网关类状态码（502/503/504）视为瞬时故障。
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => matches!(self.status(), Some(502..=504)),
        }
    }

    /// 错误分类
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unavailable { .. } => ErrorClass::Unavailable,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::Invariant(_) => ErrorClass::Violation,
            _ if self.is_retryable() => ErrorClass::Transient,
            Self::Api { status, .. } | Self::UnexpectedStatus { actual: status, .. } => {
                match *status {
                    400..=499 => ErrorClass::DomainRejection,
                    500..=599 => ErrorClass::Unavailable,
                    _ => ErrorClass::Other,
                }
            }
            _ => ErrorClass::Other,
        }
    }

    /// 构造基础设施不可用错误
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// 构造不变量错误
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}
