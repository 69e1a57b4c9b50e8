//! 各微服务客户端

mod auth;
mod health;
mod merchant;
mod order;
mod payout;
mod redemption;
mod voucher;
mod wallet;

pub use auth::AuthClient;
pub use health::{HealthClient, ServiceHealth};
pub use merchant::MerchantClient;
pub use order::OrderClient;
pub use payout::PayoutClient;
pub use redemption::RedemptionClient;
pub use voucher::VoucherClient;
pub use wallet::WalletClient;
