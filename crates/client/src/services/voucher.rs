use kado_shared::Result;

use crate::dto::{CreateVoucherRequest, VoucherDto};
use crate::http::{ApiRequest, HttpCore, RawResponse};

/// 券商品服务客户端
#[derive(Debug, Clone)]
pub struct VoucherClient {
    http: HttpCore,
}

impl VoucherClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    pub async fn create_raw(&self, token: &str, req: &CreateVoucherRequest) -> Result<RawResponse> {
        self.http
            .send(ApiRequest::post("/api/v1/vouchers").bearer(token).json(req)?)
            .await
    }

    /// 创建券（DRAFT），期望 201
    pub async fn create(&self, token: &str, req: &CreateVoucherRequest) -> Result<VoucherDto> {
        self.create_raw(token, req).await?.expect_data(201)
    }

    pub async fn publish_raw(&self, token: &str, voucher_id: i64) -> Result<RawResponse> {
        self.http
            .send(ApiRequest::post(format!("/api/v1/vouchers/{}/publish", voucher_id)).bearer(token))
            .await
    }

    /// 发布券，期望返回 ACTIVE
    pub async fn publish(&self, token: &str, voucher_id: i64) -> Result<VoucherDto> {
        self.publish_raw(token, voucher_id).await?.expect_data(200)
    }

    pub async fn toggle_pause(&self, token: &str, voucher_id: i64) -> Result<VoucherDto> {
        self.http
            .send(
                ApiRequest::post(format!("/api/v1/vouchers/{}/toggle-pause", voucher_id))
                    .bearer(token),
            )
            .await?
            .expect_data(200)
    }

    pub async fn get(&self, token: Option<&str>, voucher_id: i64) -> Result<VoucherDto> {
        self.http
            .send(ApiRequest::get(format!("/api/v1/vouchers/{}", voucher_id)).maybe_bearer(token))
            .await?
            .expect_data(200)
    }
}
