//! 平台客户端集合

use kado_shared::Result;
use kado_shared::config::AppConfig;
use kado_shared::retry::RetryPolicy;

use crate::http::{HttpCore, build_client};
use crate::services::{
    AuthClient, HealthClient, MerchantClient, OrderClient, PayoutClient, RedemptionClient,
    VoucherClient, WalletClient,
};

/// 按配置构建的全部服务客户端，共享一个连接池
#[derive(Debug, Clone)]
pub struct Platform {
    pub auth: AuthClient,
    pub merchants: MerchantClient,
    pub vouchers: VoucherClient,
    pub orders: OrderClient,
    pub wallet: WalletClient,
    pub redemptions: RedemptionClient,
    pub payouts: PayoutClient,
    pub health: HealthClient,
}

impl Platform {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = build_client(&config.http)?;
        let retry = RetryPolicy::from(&config.retry);
        let endpoints = &config.endpoints;
        let core = |service: &'static str, base_url: &str| {
            HttpCore::new(client.clone(), service, base_url, retry.clone())
        };

        Ok(Self {
            auth: AuthClient::new(core("auth", &endpoints.auth)),
            merchants: MerchantClient::new(core("merchant", &endpoints.merchant)),
            vouchers: VoucherClient::new(core("voucher", &endpoints.voucher)),
            orders: OrderClient::new(
                core("order", &endpoints.order),
                core("payment", endpoints.payment_url()),
            ),
            wallet: WalletClient::new(core("wallet", &endpoints.wallet)),
            redemptions: RedemptionClient::new(core("redemption", &endpoints.redemption)),
            payouts: PayoutClient::new(
                core("payout", &endpoints.payout),
                config.payout.internal_secret.clone(),
            ),
            health: HealthClient::new(client.clone()),
        })
    }
}
