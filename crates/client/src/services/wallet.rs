use kado_shared::Result;

use crate::dto::{GiftRequest, WalletEntry};
use crate::envelope::Listing;
use crate::http::{ApiRequest, HttpCore, RawResponse, unreachable_as_unavailable};

/// 钱包服务客户端
///
/// 钱包服务不可达或返回 5xx 时报告为 [`KadoError::Unavailable`]，
/// 由上层计为跳过而非失败。
///
/// [`KadoError::Unavailable`]: kado_shared::KadoError::Unavailable
#[derive(Debug, Clone)]
pub struct WalletClient {
    http: HttpCore,
}

impl WalletClient {
    pub fn new(http: HttpCore) -> Self {
        Self { http }
    }

    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.http
            .send(request)
            .await
            .map_err(|e| unreachable_as_unavailable("wallet", e))?
            .unavailable_on_5xx()
    }

    /// 当前用户钱包中的全部券
    pub async fn list(&self, token: &str) -> Result<Vec<WalletEntry>> {
        let listing: Listing<WalletEntry> = self
            .send(ApiRequest::get("/api/v1/wallet").bearer(token))
            .await?
            .expect_data(200)?;
        Ok(listing.into_items())
    }

    pub async fn get(&self, token: &str, entry_id: i64) -> Result<WalletEntry> {
        self.send(ApiRequest::get(format!("/api/v1/wallet/{}", entry_id)).bearer(token))
            .await?
            .expect_data(200)
    }

    pub async fn gift_raw(&self, token: &str, entry_id: i64, req: &GiftRequest) -> Result<RawResponse> {
        self.send(
            ApiRequest::post(format!("/api/v1/wallet/{}/gift", entry_id))
                .bearer(token)
                .json(req)?,
        )
        .await
    }

    /// 转赠给其他用户
    pub async fn gift(&self, token: &str, entry_id: i64, req: &GiftRequest) -> Result<WalletEntry> {
        self.gift_raw(token, entry_id, req).await?.expect_success()
    }
}
