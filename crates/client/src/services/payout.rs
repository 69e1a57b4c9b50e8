use kado_shared::Result;

use crate::dto::{CreateHoldRequest, PayoutDto, PayoutHold, PayoutSimulation, PayoutSimulationRequest};
use crate::envelope::Listing;
use crate::http::{ApiRequest, HttpCore, RawResponse, unreachable_as_unavailable};

const INTERNAL_SECRET_HEADER: &str = "X-Internal-Secret";

/// 结算服务客户端
#[derive(Debug, Clone)]
pub struct PayoutClient {
    http: HttpCore,
    internal_secret: String,
}

impl PayoutClient {
    pub fn new(http: HttpCore, internal_secret: impl Into<String>) -> Self {
        Self {
            http,
            internal_secret: internal_secret.into(),
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.http
            .send(request)
            .await
            .map_err(|e| unreachable_as_unavailable("payout", e))
    }

    /// 周结算模拟（原始响应，调用方决定被拒后的降级方式）
    pub async fn simulate_raw(
        &self,
        token: Option<&str>,
        req: &PayoutSimulationRequest,
    ) -> Result<RawResponse> {
        self.send(
            ApiRequest::post("/api/v1/payouts/simulate")
                .maybe_bearer(token)
                .json(req)?,
        )
        .await
    }

    pub async fn simulate(
        &self,
        token: Option<&str>,
        req: &PayoutSimulationRequest,
    ) -> Result<PayoutSimulation> {
        self.simulate_raw(token, req)
            .await?
            .unavailable_on_5xx()?
            .expect_success()
    }

    // ========== 内部接口 ==========

    /// 当前生效的结算冻结
    pub async fn list_holds(&self) -> Result<Vec<PayoutHold>> {
        let listing: Listing<PayoutHold> = self
            .send(
                ApiRequest::get("/api/v1/payouts/internal/holds")
                    .header(INTERNAL_SECRET_HEADER, self.internal_secret.clone()),
            )
            .await?
            .unavailable_on_5xx()?
            .expect_success()?;
        Ok(listing.into_items())
    }

    /// 登记结算冻结
    pub async fn create_hold(&self, req: &CreateHoldRequest) -> Result<PayoutHold> {
        self.send(
            ApiRequest::post("/api/v1/payouts/internal/holds")
                .header(INTERNAL_SECRET_HEADER, self.internal_secret.clone())
                .json(req)?,
        )
        .await?
        .unavailable_on_5xx()?
        .expect_success()
    }

    /// 商户自己的结算记录
    pub async fn my_payouts(&self, token: &str) -> Result<Vec<PayoutDto>> {
        let listing: Listing<PayoutDto> = self
            .send(ApiRequest::get("/api/v1/payouts").bearer(token))
            .await?
            .unavailable_on_5xx()?
            .expect_success()?;
        Ok(listing.into_items())
    }
}
