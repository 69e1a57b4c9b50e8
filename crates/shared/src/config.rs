//! 配置管理模块
//!
//! 支持配置文件加载、环境变量覆盖，以及类型安全的配置访问。
//! 兼容早期脚本沿用的 `AUTH_BASE_URL` 等无前缀变量。

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// 各微服务的基础地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub auth: String,
    pub user: String,
    pub voucher: String,
    pub order: String,
    /// 支付接口默认与订单服务同源
    pub payment: Option<String>,
    /// payment-service 自身的地址，仅用于健康检查
    pub payment_service: String,
    pub wallet: String,
    pub redemption: String,
    pub merchant: String,
    pub admin: String,
    pub notification: String,
    pub payout: String,
    pub analytics: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            auth: "http://localhost:8081".to_string(),
            user: "http://localhost:8082".to_string(),
            voucher: "http://localhost:8083".to_string(),
            order: "http://localhost:8084".to_string(),
            payment: None,
            payment_service: "http://localhost:8085".to_string(),
            wallet: "http://localhost:8086".to_string(),
            redemption: "http://localhost:8087".to_string(),
            merchant: "http://localhost:8088".to_string(),
            admin: "http://localhost:8089".to_string(),
            notification: "http://localhost:8091".to_string(),
            payout: "http://localhost:8092".to_string(),
            analytics: "http://localhost:8093".to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// 支付接口地址
    pub fn payment_url(&self) -> &str {
        self.payment.as_deref().unwrap_or(&self.order)
    }

    /// 健康检查矩阵：(服务名, 基础地址)
    pub fn health_targets(&self) -> Vec<(&'static str, String)> {
        vec![
            ("auth-service", self.auth.clone()),
            ("user-service", self.user.clone()),
            ("voucher-service", self.voucher.clone()),
            ("order-service", self.order.clone()),
            ("payment-service", self.payment_service.clone()),
            ("wallet-service", self.wallet.clone()),
            ("redemption-service", self.redemption.clone()),
            ("merchant-service", self.merchant.clone()),
            ("admin-portal-backend", self.admin.clone()),
            ("notification-service", self.notification.clone()),
            ("payout-service", self.payout.clone()),
            ("analytics-service", self.analytics.clone()),
        ]
    }
}

/// HTTP 客户端配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// 下单、支付请求的重试配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 总尝试次数（含首次）
    pub max_attempts: u32,
    /// 固定退避间隔
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 2_000,
        }
    }
}

/// 最终一致性轮询配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub timeout_secs: u64,
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            interval_ms: 2_000,
        }
    }
}

/// 管理员账号
///
/// 登录失败时套件会注册一个新的 ADMIN 账号代替。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminCredentials {
    pub identifier: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            identifier: "admin@kado24.com".to_string(),
            password: "Admin@123456".to_string(),
        }
    }
}

/// 结算服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayoutConfig {
    /// 内部接口共享密钥（X-Internal-Secret）
    pub internal_secret: String,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            internal_secret: "kado24-internal-secret".to_string(),
        }
    }
}

/// 测试数据构造配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub category_id: i64,
    pub stock_quantity: i32,
    pub denominations: Vec<Decimal>,
    pub validity_days: i64,
    pub payment_method: String,
    pub redemption_location: String,
    /// 预先准备好的已过期券 ID，未配置时跳过过期购买场景
    pub expired_voucher_id: Option<i64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            category_id: 1,
            stock_quantity: 500,
            denominations: vec![Decimal::new(1000, 2), Decimal::new(2500, 2), Decimal::new(5000, 2)],
            validity_days: 90,
            payment_method: "ABA".to_string(),
            redemption_location: "Phnom Penh".to_string(),
            expired_voucher_id: None,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 是否输出 JSON 格式日志
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: String,
    pub endpoints: ServiceEndpoints,
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub polling: PollingConfig,
    pub admin: AdminCredentials,
    pub payout: PayoutConfig,
    pub fixtures: FixtureConfig,
    pub observability: ObservabilityConfig,
}

/// 兼容的无前缀环境变量
const LEGACY_ENDPOINT_VARS: &[&str] = &[
    "AUTH_BASE_URL",
    "MERCHANT_BASE_URL",
    "VOUCHER_BASE_URL",
    "ORDER_BASE_URL",
    "PAYMENT_BASE_URL",
    "WALLET_BASE_URL",
    "REDEMPTION_BASE_URL",
    "PAYOUT_BASE_URL",
];

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 0. 当前目录的 .env（不覆盖已有变量）
    /// 1. 内置默认值
    /// 2. config/default.toml
    /// 3. config/{environment}.toml（由 KADO_ENV 指定）
    /// 4. KADO_ 前缀环境变量（KADO_ENDPOINTS__WALLET -> endpoints.wallet）
    /// 5. 无前缀的 *_BASE_URL 变量
    pub fn load() -> Result<Self, ConfigError> {
        // 工作目录下的 .env 可选
        let _ = dotenvy::dotenv();

        let env = std::env::var("KADO_ENV").unwrap_or_else(|_| "local".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                Environment::with_prefix("KADO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// 应用无前缀的服务地址变量
    ///
    /// `lookup` 便于测试时注入变量表而不修改进程环境。
    pub fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for name in LEGACY_ENDPOINT_VARS {
            let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let value = value.trim_end_matches('/').to_string();
            let endpoints = &mut self.endpoints;
            match *name {
                "AUTH_BASE_URL" => endpoints.auth = value,
                "MERCHANT_BASE_URL" => endpoints.merchant = value,
                "VOUCHER_BASE_URL" => endpoints.voucher = value,
                "ORDER_BASE_URL" => endpoints.order = value,
                "PAYMENT_BASE_URL" => endpoints.payment = Some(value),
                "WALLET_BASE_URL" => endpoints.wallet = value,
                "REDEMPTION_BASE_URL" => endpoints.redemption = value,
                "PAYOUT_BASE_URL" => endpoints.payout = value,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.endpoints.auth, "http://localhost:8081");
        assert_eq!(config.endpoints.payout, "http://localhost:8092");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.polling.timeout_secs, 30);
        assert_eq!(config.fixtures.denominations.len(), 3);
        assert_eq!(config.fixtures.denominations[1], Decimal::new(25, 0));
    }

    #[test]
    fn test_payment_defaults_to_order_service() {
        let mut endpoints = ServiceEndpoints::default();
        assert_eq!(endpoints.payment_url(), "http://localhost:8084");

        endpoints.payment = Some("http://payments:9000".to_string());
        assert_eq!(endpoints.payment_url(), "http://payments:9000");
    }

    #[test]
    fn test_legacy_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("WALLET_BASE_URL", "http://wallet.test:18086/"),
            ("ORDER_BASE_URL", "http://order.test:18084"),
            ("PAYOUT_BASE_URL", "  "),
        ]);

        let mut config = AppConfig::default();
        config.apply_legacy_env(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.endpoints.wallet, "http://wallet.test:18086");
        assert_eq!(config.endpoints.order, "http://order.test:18084");
        // 空值不覆盖
        assert_eq!(config.endpoints.payout, "http://localhost:8092");
        // 未设置 PAYMENT_BASE_URL 时随订单服务
        assert_eq!(config.endpoints.payment_url(), "http://order.test:18084");
    }

    #[test]
    fn test_health_targets_cover_all_services() {
        let mut endpoints = ServiceEndpoints::default();
        let targets = endpoints.health_targets();
        assert_eq!(targets.len(), 12);
        assert!(targets.contains(&("payment-service", "http://localhost:8085".to_string())));

        // 支付接口改址不影响 payment-service 的健康检查地址
        endpoints.payment = Some("http://payments:9000".to_string());
        let targets = endpoints.health_targets();
        assert_eq!(targets.len(), 12);
        assert!(targets.contains(&("payment-service", "http://localhost:8085".to_string())));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                "[endpoints]\nwallet = \"http://wallet:1\"\n[polling]\ntimeout_secs = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.endpoints.wallet, "http://wallet:1");
        assert_eq!(config.endpoints.auth, "http://localhost:8081");
        assert_eq!(config.polling.timeout_secs, 5);
        assert_eq!(config.polling.interval_ms, 2_000);
    }
}
