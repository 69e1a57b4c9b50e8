use kado_shared::Result;

use crate::dto::{MerchantDto, MerchantRegistrationRequest, SuspendMerchantRequest};
use crate::envelope::Listing;
use crate::http::{ApiRequest, HttpCore, RawResponse};

/// 商户服务客户端
#[derive(Debug, Clone)]
pub struct MerchantClient {
    http: HttpCore,
}

impl MerchantClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    // ========== 商户自助 ==========

    /// 提交商户资料，期望 201 且状态为 PENDING
    pub async fn register(
        &self,
        token: &str,
        req: &MerchantRegistrationRequest,
    ) -> Result<MerchantDto> {
        self.http
            .send(
                ApiRequest::post("/api/v1/merchants/register")
                    .bearer(token)
                    .json(req)?,
            )
            .await?
            .expect_data(201)
    }

    /// 当前商户资料
    pub async fn my_profile(&self, token: &str) -> Result<MerchantDto> {
        self.http
            .send(ApiRequest::get("/api/v1/merchants/my-profile").bearer(token))
            .await?
            .expect_data(200)
    }

    pub async fn get(&self, token: &str, merchant_id: i64) -> Result<MerchantDto> {
        self.http
            .send(ApiRequest::get(format!("/api/v1/merchants/{}", merchant_id)).bearer(token))
            .await?
            .expect_data(200)
    }

    // ========== 管理员审核 ==========

    /// 待审核商户列表
    pub async fn pending(&self, admin_token: &str) -> Result<Vec<MerchantDto>> {
        let listing: Listing<MerchantDto> = self
            .http
            .send(ApiRequest::get("/api/v1/merchants/pending").bearer(admin_token))
            .await?
            .expect_success()?;
        Ok(listing.into_items())
    }

    pub async fn approve_raw(&self, admin_token: &str, merchant_id: i64) -> Result<RawResponse> {
        self.http
            .send(
                ApiRequest::post(format!("/api/v1/merchants/{}/approve", merchant_id))
                    .bearer(admin_token),
            )
            .await
    }

    pub async fn approve(&self, admin_token: &str, merchant_id: i64) -> Result<MerchantDto> {
        self.approve_raw(admin_token, merchant_id)
            .await?
            .expect_data(200)
    }

    /// 驳回，原因通过查询参数传递
    pub async fn reject(
        &self,
        admin_token: &str,
        merchant_id: i64,
        reason: &str,
    ) -> Result<MerchantDto> {
        self.http
            .send(
                ApiRequest::post(format!("/api/v1/merchants/{}/reject", merchant_id))
                    .bearer(admin_token)
                    .query("reason", reason),
            )
            .await?
            .expect_data(200)
    }

    pub async fn suspend(
        &self,
        admin_token: &str,
        merchant_id: i64,
        reason: &str,
    ) -> Result<MerchantDto> {
        let body = SuspendMerchantRequest {
            reason: reason.to_string(),
        };
        self.http
            .send(
                ApiRequest::post(format!("/api/v1/merchants/{}/suspend", merchant_id))
                    .bearer(admin_token)
                    .json(&body)?,
            )
            .await?
            .expect_data(200)
    }
}
