//! Configuration loading and validation.
//!
//! [`Config`] is read once at startup from TOML; every field has a default
//! so an empty file (or no file at all) yields a working setup. The
//! aggregator only sees the validated [`AggregatorConfig`] subset.
//!
//! ```no_run
//! use aeon_rate_aggregator::Config;
//!
//! fn main() -> Result<(), aeon_rate_aggregator::AggregatorError> {
//!     let config = Config::load("aeon-rates.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use crate::common::exchange::CexExchange;
use crate::common::logging::LoggingConfig;
use crate::common::pair::{DEFAULT_QUOTE_CURRENCIES, PairNormalizer};
use crate::common::AggregatorError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Minimum number of exchanges that must contribute pairs.
pub const MIN_EXCHANGES_REQUIRED: usize = 2;

/// Minimum number of valid quotes for a best-rate answer.
pub const MIN_QUOTES_REQUIRED: usize = 2;

/// Slack applied when comparing a profit percentage against the threshold.
pub const FLOATING_POINT_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fail the common-pair computation when any exchange has no data.
    pub require_all_exchanges: bool,
    /// Ordered suffix list used to split symbols like `BTCUSDT`.
    pub quote_currencies: Vec<String>,
    pub cache: CacheConfig,
    pub arbitrage: ArbitrageConfig,
    pub http: HttpConfig,
    pub exchanges: ExchangesConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            require_all_exchanges: false,
            quote_currencies: DEFAULT_QUOTE_CURRENCIES
                .iter()
                .map(|q| q.to_string())
                .collect(),
            cache: CacheConfig::default(),
            arbitrage: ArbitrageConfig::default(),
            http: HttpConfig::default(),
            exchanges: ExchangesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Cache lifetimes in seconds. Zero disables the cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub pairs_ttl: u64,
    pub prices_ttl: u64,
}

impl CacheConfig {
    pub fn pairs_ttl(&self) -> Duration {
        Duration::from_secs(self.pairs_ttl)
    }

    pub fn prices_ttl(&self) -> Duration {
        Duration::from_secs(self.prices_ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pairs_ttl: 600,
            prices_ttl: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArbitrageConfig {
    /// Spreads above this are treated as stale or bogus data.
    pub max_profit_percent: f64,
    /// `false` scans last-trade prices instead of bid/ask quotes.
    pub use_bid_ask: bool,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            max_profit_percent: 50.0,
            use_bid_ask: true,
        }
    }
}

/// Transport policy shared by every exchange client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout, seconds.
    pub timeout: u64,
    /// Connect timeout, seconds.
    pub connect_timeout: u64,
    /// Extra attempts after the first failure.
    pub retry_times: u32,
    pub retry_sleep_ms: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn retry_sleep(&self) -> Duration {
        Duration::from_millis(self.retry_sleep_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 12,
            connect_timeout: 7,
            retry_times: 2,
            retry_sleep_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub enabled: bool,
    /// Overrides the exchange's public REST host.
    pub base_url: Option<String>,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExchangesConfig {
    pub binance: ExchangeSettings,
    pub bybit: ExchangeSettings,
    pub whitebit: ExchangeSettings,
    pub poloniex: ExchangeSettings,
}

impl ExchangesConfig {
    pub fn get(&self, exchange: &CexExchange) -> &ExchangeSettings {
        match exchange {
            CexExchange::Binance => &self.binance,
            CexExchange::Bybit => &self.bybit,
            CexExchange::Whitebit => &self.whitebit,
            CexExchange::Poloniex => &self.poloniex,
        }
    }

    pub fn base_url(&self, exchange: &CexExchange) -> String {
        self.get(exchange)
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| exchange.default_base_url().to_string())
    }

    /// Enabled exchanges in fixed order.
    pub fn enabled(&self) -> Vec<CexExchange> {
        CexExchange::ALL
            .iter()
            .filter(|ex| self.get(ex).enabled)
            .cloned()
            .collect()
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AggregatorError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AggregatorError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AggregatorError> {
        if self.quote_currencies.iter().all(|q| q.trim().is_empty()) {
            return Err(AggregatorError::Config(
                "quote_currencies must contain at least one currency".to_string(),
            ));
        }

        if self.quote_currencies.iter().any(|q| q.trim().is_empty()) {
            return Err(AggregatorError::Config(
                "quote_currencies must not contain blank entries".to_string(),
            ));
        }

        if self.http.timeout == 0 {
            return Err(AggregatorError::Config(
                "http.timeout must be greater than zero".to_string(),
            ));
        }

        for exchange in CexExchange::ALL {
            let settings = self.exchanges.get(exchange);
            if !settings.enabled {
                continue;
            }
            if let Some(url) = &settings.base_url {
                if url.trim().is_empty() {
                    return Err(AggregatorError::Config(format!(
                        "exchanges.{}.base_url must not be blank",
                        exchange.code()
                    )));
                }
            }
        }

        self.aggregator().validate()
    }

    pub fn normalizer(&self) -> PairNormalizer {
        PairNormalizer::new(&self.quote_currencies)
    }

    pub fn aggregator(&self) -> AggregatorConfig {
        AggregatorConfig {
            pairs_ttl: self.cache.pairs_ttl(),
            require_all_exchanges: self.require_all_exchanges,
            max_profit_percent: self.arbitrage.max_profit_percent,
            use_bid_ask: self.arbitrage.use_bid_ask,
        }
    }
}

/// The slice of configuration the aggregator acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    pub pairs_ttl: Duration,
    pub require_all_exchanges: bool,
    pub max_profit_percent: f64,
    pub use_bid_ask: bool,
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<(), AggregatorError> {
        if !self.max_profit_percent.is_finite() || self.max_profit_percent <= 0.0 {
            return Err(AggregatorError::Config(format!(
                "arbitrage.max_profit_percent must be a positive number, got {}",
                self.max_profit_percent
            )));
        }
        Ok(())
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Config::default().aggregator()
    }
}
