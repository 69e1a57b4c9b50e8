//! 场景共用的流程积木
//!
//! 每个场景都从零开始：注册新用户、入驻新商户、发布新券，
//! 场景之间不共享任何业务数据，只共享管理员令牌与连接池。

use async_trait::async_trait;
use kado_client::dto::{
    AuthResponse, LoginRequest, OrderDto, PaymentRequest, PaymentResponse, RedemptionDto, Role,
    UserInfo, VerificationStatus, VoucherDto, VoucherStatus, WalletEntry,
};
use kado_client::{Platform, RawResponse, WalletClient};
use kado_shared::config::{AppConfig, FixtureConfig};
use kado_shared::poll::{PollPolicy, poll_until};
use kado_shared::{KadoError, Result};
use rust_decimal::Decimal;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::fixtures;
use crate::model::lifecycle::{verify_merchant_status, verify_voucher_status};
use crate::model::order::verify_new_order;

/// 已登录的平台用户
#[derive(Debug, Clone)]
pub struct Actor {
    pub token: String,
    pub user: UserInfo,
    pub email: String,
    pub password: String,
}

impl Actor {
    fn from_auth(auth: AuthResponse, email: String, password: String) -> Self {
        Self {
            token: auth.access_token,
            user: auth.user,
            email,
            password,
        }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// 已通过审核的商户
#[derive(Debug, Clone)]
pub struct MerchantActor {
    pub actor: Actor,
    pub merchant_id: i64,
}

/// 一次完成支付的购买
#[derive(Debug, Clone)]
pub struct Purchase {
    pub order: OrderDto,
    pub payment: PaymentResponse,
}

/// 钱包列表来源，抽象出来以便在单元测试中替换
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletSource: Send + Sync {
    async fn wallet_entries(&self, token: &str) -> Result<Vec<WalletEntry>>;
}

#[async_trait]
impl WalletSource for WalletClient {
    async fn wallet_entries(&self, token: &str) -> Result<Vec<WalletEntry>> {
        self.list(token).await
    }
}

/// 轮询钱包直到出现满足条件的券
///
/// 钱包发券是异步的，截止时间内未出现时返回 [`KadoError::Timeout`]。
pub async fn wait_for_wallet_entry<S, P>(
    source: &S,
    policy: &PollPolicy,
    token: &str,
    predicate: P,
) -> Result<WalletEntry>
where
    S: WalletSource + ?Sized,
    P: Fn(&WalletEntry) -> bool,
{
    let predicate = &predicate;
    poll_until(policy, "wallet_issuance", || async move {
        let entries = source.wallet_entries(token).await?;
        Ok(entries.into_iter().find(|e| predicate(e)))
    })
    .await
}

/// 场景执行上下文
pub struct FlowContext {
    pub platform: Platform,
    pub config: AppConfig,
    admin_token: OnceCell<String>,
}

impl FlowContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let platform = Platform::new(&config)?;
        Ok(Self {
            platform,
            config,
            admin_token: OnceCell::new(),
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from(&self.config.polling)
    }

    pub fn fixtures(&self) -> &FixtureConfig {
        &self.config.fixtures
    }

    // ========== 账号 ==========

    /// 注册一个新用户，返回已登录的身份
    #[instrument(skip(self))]
    pub async fn register_actor(&self, role: Role, prefix: &str) -> Result<Actor> {
        let request = fixtures::register_request(role, prefix);
        let auth = self.platform.auth.register(&request).await?;
        debug!(user_id = auth.user.id, ?role, "注册用户");
        Ok(Actor::from_auth(auth, request.email, request.password))
    }

    /// 管理员令牌：先用配置的账号登录，失败时注册一个 ADMIN 账号
    pub async fn admin_token(&self) -> Result<String> {
        self.admin_token
            .get_or_try_init(|| async {
                let admin = &self.config.admin;
                let login = LoginRequest {
                    identifier: admin.identifier.clone(),
                    password: admin.password.clone(),
                };
                match self.platform.auth.login(&login).await {
                    Ok(auth) => {
                        info!(identifier = %admin.identifier, "管理员登录成功");
                        Ok(auth.access_token)
                    }
                    Err(e) if !e.is_retryable() => {
                        warn!(error = %e, "管理员登录失败，改为注册临时管理员");
                        let actor = self.register_actor(Role::Admin, "admin").await?;
                        Ok(actor.token)
                    }
                    Err(e) => Err(e),
                }
            })
            .await
            .cloned()
    }

    // ========== 商户与券 ==========

    /// 注册商户账号并提交资料，停在 PENDING
    pub async fn register_pending_merchant(&self) -> Result<(Actor, i64)> {
        let actor = self.register_actor(Role::Merchant, "merchant").await?;
        let profile = fixtures::merchant_profile(&actor.email);
        let merchant = self.platform.merchants.register(&actor.token, &profile).await?;
        verify_merchant_status(&merchant, None, VerificationStatus::Pending)?;
        Ok((actor, merchant.id))
    }

    /// 注册并审核通过一个商户
    #[instrument(skip(self))]
    pub async fn onboard_merchant(&self) -> Result<MerchantActor> {
        let (actor, merchant_id) = self.register_pending_merchant().await?;
        let admin = self.admin_token().await?;
        let approved = self.platform.merchants.approve(&admin, merchant_id).await?;
        verify_merchant_status(
            &approved,
            Some(VerificationStatus::Pending),
            VerificationStatus::Approved,
        )?;
        info!(merchant_id, "商户已审核通过");
        Ok(MerchantActor { actor, merchant_id })
    }

    /// 创建并发布券，返回 ACTIVE 状态的券
    #[instrument(skip(self, merchant, denominations))]
    pub async fn publish_voucher(
        &self,
        merchant: &MerchantActor,
        title: &str,
        denominations: Vec<Decimal>,
        stock: i32,
    ) -> Result<VoucherDto> {
        let request = fixtures::voucher_request(self.fixtures(), title, denominations, stock);
        let draft = self
            .platform
            .vouchers
            .create(&merchant.actor.token, &request)
            .await?;
        let published = self
            .platform
            .vouchers
            .publish(&merchant.actor.token, draft.id)
            .await?;
        verify_voucher_status(&published, Some(draft.status), VoucherStatus::Active)?;
        debug!(voucher_id = published.id, stock, "券已发布");
        Ok(published)
    }

    /// 使用默认面值与库存发布一张券
    pub async fn publish_default_voucher(&self, merchant: &MerchantActor) -> Result<VoucherDto> {
        let fixtures = self.fixtures();
        self.publish_voucher(
            merchant,
            "Conformance Voucher",
            fixtures.denominations.clone(),
            fixtures.stock_quantity,
        )
        .await
    }

    /// 审核通过的商户及其发布的默认券
    pub async fn merchant_with_voucher(&self) -> Result<(MerchantActor, VoucherDto)> {
        let merchant = self.onboard_merchant().await?;
        let voucher = self.publish_default_voucher(&merchant).await?;
        Ok((merchant, voucher))
    }

    /// 券的第一个面值，券未返回面值时使用配置的第一个
    pub fn first_denomination(&self, voucher: &VoucherDto) -> Result<Decimal> {
        voucher
            .denominations
            .first()
            .or_else(|| self.fixtures().denominations.first())
            .copied()
            .ok_or_else(|| KadoError::Validation(format!("券 {} 没有可选面值", voucher.id)))
    }

    // ========== 订单与支付 ==========

    pub async fn create_order(
        &self,
        consumer: &Actor,
        voucher_id: i64,
        denomination: Decimal,
    ) -> Result<OrderDto> {
        let order = self
            .platform
            .orders
            .create(&consumer.token, &fixtures::order_request(voucher_id, denomination))
            .await?;
        verify_new_order(&order, denomination)?;
        Ok(order)
    }

    pub fn payment_request(&self, order_id: i64, amount: Decimal) -> PaymentRequest {
        PaymentRequest {
            order_id,
            payment_method: self.fixtures().payment_method.clone(),
            amount,
        }
    }

    /// 按订单总额支付（带瞬时故障重试）
    pub async fn pay_order(&self, consumer: &Actor, order: &OrderDto) -> Result<PaymentResponse> {
        let request = self.payment_request(order.id, order.total_amount);
        self.platform.orders.pay(&consumer.token, &request).await
    }

    /// 单次支付，不重试，用于负向与并发场景
    pub async fn pay_once(
        &self,
        consumer: &Actor,
        order_id: i64,
        amount: Decimal,
    ) -> Result<RawResponse> {
        let request = self.payment_request(order_id, amount);
        self.platform.orders.pay_once(&consumer.token, &request).await
    }

    /// 下单并支付，返回支付后的订单快照
    #[instrument(skip(self, consumer), fields(consumer = consumer.id()))]
    pub async fn purchase(
        &self,
        consumer: &Actor,
        voucher_id: i64,
        denomination: Decimal,
    ) -> Result<Purchase> {
        let order = self.create_order(consumer, voucher_id, denomination).await?;
        let payment = self.pay_order(consumer, &order).await?;
        let order = self.platform.orders.get(&consumer.token, order.id).await?;
        if !order.is_paid() {
            return Err(KadoError::invariant(format!(
                "订单 {} 支付成功后仍为 {:?}/{:?}",
                order.id, order.order_status, order.payment_status
            )));
        }
        Ok(Purchase { order, payment })
    }

    // ========== 钱包与核销 ==========

    /// 等待指定券出现在用户钱包中
    pub async fn wait_for_voucher(&self, owner: &Actor, voucher_id: i64) -> Result<WalletEntry> {
        wait_for_wallet_entry(
            &self.platform.wallet,
            &self.poll_policy(),
            &owner.token,
            |entry| entry.voucher_id == Some(voucher_id),
        )
        .await
    }

    /// 按券码查钱包条目，钱包中没有时返回 `None`
    pub async fn find_wallet_entry(&self, owner: &Actor, voucher_code: &str) -> Result<Option<WalletEntry>> {
        let entries = self.platform.wallet.list(&owner.token).await?;
        Ok(entries.into_iter().find(|e| e.voucher_code == voucher_code))
    }

    pub async fn redeem_raw(
        &self,
        merchant: &MerchantActor,
        voucher_code: &str,
        amount: Decimal,
    ) -> Result<RawResponse> {
        let request = fixtures::redeem_request(self.fixtures(), voucher_code, amount);
        self.platform
            .redemptions
            .redeem_raw(&merchant.actor.token, &request)
            .await
    }

    pub async fn redeem(
        &self,
        merchant: &MerchantActor,
        voucher_code: &str,
        amount: Decimal,
    ) -> Result<RedemptionDto> {
        let request = fixtures::redeem_request(self.fixtures(), voucher_code, amount);
        self.platform
            .redemptions
            .redeem(&merchant.actor.token, &request)
            .await
    }
}
