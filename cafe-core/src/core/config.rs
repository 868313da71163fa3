use std::time::Duration;

use cafe_client::ClientConfig;
use rust_decimal::Decimal;

use crate::checkout::PollConfig;

/// 应用配置 - 下单核心的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（`.env` 文件同样生效）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | CAFE_API_URL | (unset) | 后端 API 地址 |
/// | CAFE_LOCATION_URL | http://localhost:3000 | 位置搜索 API 地址 |
/// | CAFE_HTTP_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | CAFE_STATE_PATH | (unset) | 本地状态快照文件 (redb)，未设置时不持久化 |
/// | PAYMENT_POLL_INTERVAL_MS | 3000 | 支付状态轮询间隔 |
/// | PAYMENT_POLL_MAX_ATTEMPTS | 60 | 最大轮询次数 |
/// | SEARCH_DEBOUNCE_MS | 300 | 地址搜索防抖 |
/// | DELIVERY_FEE_GHS | 0 | 外送费 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录 |
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend / location API client settings
    pub client: ClientConfig,
    /// redb snapshot path; `None` keeps state in memory only
    pub state_path: Option<String>,
    /// Payment status polling
    pub poll: PollConfig,
    /// Place search debounce
    pub search_debounce: Duration,
    /// Flat delivery fee, applied to delivery orders only
    pub delivery_fee: Decimal,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let defaults = PollConfig::default();
        Self {
            client: ClientConfig::from_env(),
            state_path: std::env::var("CAFE_STATE_PATH").ok(),
            poll: PollConfig {
                interval: std::env::var("PAYMENT_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.interval),
                max_attempts: std::env::var("PAYMENT_POLL_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_attempts),
            },
            search_debounce: std::env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(crate::location::DEFAULT_DEBOUNCE),
            delivery_fee: std::env::var("DELIVERY_FEE_GHS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Decimal::ZERO),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Load `.env` (if present) then read the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::unconfigured(),
            state_path: None,
            poll: PollConfig::default(),
            search_debounce: crate::location::DEFAULT_DEBOUNCE,
            delivery_fee: Decimal::ZERO,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}
