use kado_shared::Result;

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::http::{ApiRequest, HttpCore, RawResponse};

/// 认证服务客户端
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpCore,
}

impl AuthClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    /// 注册账号（原始响应，用于重复邮箱等负向断言）
    pub async fn register_raw(&self, req: &RegisterRequest) -> Result<RawResponse> {
        self.http
            .send(ApiRequest::post("/api/v1/auth/register").json(req)?)
            .await
    }

    /// 注册账号，期望 201
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        self.register_raw(req).await?.expect_data(201)
    }

    pub async fn login_raw(&self, req: &LoginRequest) -> Result<RawResponse> {
        self.http
            .send(ApiRequest::post("/api/v1/auth/login").json(req)?)
            .await
    }

    /// 登录，期望 200
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.login_raw(req).await?.expect_data(200)
    }
}
