use kado_shared::Result;

use crate::dto::{RedeemRequest, RedemptionDto};
use crate::envelope::Listing;
use crate::http::{ApiRequest, HttpCore, RawResponse};

/// 核销服务客户端
#[derive(Debug, Clone)]
pub struct RedemptionClient {
    http: HttpCore,
}

impl RedemptionClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    /// 商户扫码核销（原始响应，重复核销时需要区分拒绝与幂等返回）
    pub async fn redeem_raw(&self, merchant_token: &str, req: &RedeemRequest) -> Result<RawResponse> {
        self.http
            .send(
                ApiRequest::post("/api/v1/redemptions/redeem")
                    .bearer(merchant_token)
                    .json(req)?,
            )
            .await
    }

    /// 核销，期望 200
    pub async fn redeem(&self, merchant_token: &str, req: &RedeemRequest) -> Result<RedemptionDto> {
        self.redeem_raw(merchant_token, req).await?.expect_data(200)
    }

    /// 当前用户的核销记录
    pub async fn my_redemptions(&self, token: &str) -> Result<Vec<RedemptionDto>> {
        let listing: Listing<RedemptionDto> = self
            .http
            .send(ApiRequest::get("/api/v1/redemptions/my-redemptions").bearer(token))
            .await?
            .expect_success()?;
        Ok(listing.into_items())
    }
}
