use crate::common::cache::{CacheKeys, CacheStore};
use crate::common::config::HttpConfig;
use crate::common::pair::{Pair, PairNormalizer};
use crate::common::price::{PriceMap, QuoteMap};
use crate::common::AggregatorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CexExchange {
    Binance,
    Bybit,
    Whitebit,
    Poloniex,
}

impl CexExchange {
    pub const ALL: &'static [CexExchange] = &[
        CexExchange::Binance,
        CexExchange::Bybit,
        CexExchange::Whitebit,
        CexExchange::Poloniex,
    ];

    /// Stable identifier used in config keys, cache keys and quotes.
    pub fn code(&self) -> &'static str {
        match self {
            CexExchange::Binance => "binance",
            CexExchange::Bybit => "bybit",
            CexExchange::Whitebit => "whitebit",
            CexExchange::Poloniex => "poloniex",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CexExchange::Binance => "Binance",
            CexExchange::Bybit => "Bybit",
            CexExchange::Whitebit => "WhiteBIT",
            CexExchange::Poloniex => "Poloniex",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            CexExchange::Binance => "https://data-api.binance.vision",
            CexExchange::Bybit => "https://api.bybit.com",
            CexExchange::Whitebit => "https://whitebit.com",
            CexExchange::Poloniex => "https://api.poloniex.com",
        }
    }
}

/// What the aggregator needs from an exchange.
///
/// Implementations must not surface transport or parsing problems: they log
/// them and hand back an empty result. The aggregator still treats an `Err`
/// exactly like an empty result.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Exchange code (`binance`, `bybit`).
    fn code(&self) -> &str;

    /// Display name (`Binance`, `Bybit`).
    fn name(&self) -> &str;

    /// Deduplicated, normalized pairs. Empty means "no usable data".
    async fn list_pairs(&self) -> Result<Vec<Pair>, AggregatorError>;

    /// Last prices, only for pairs that could be resolved; every price is `> 0`.
    async fn prices_for_pairs(&self, pairs: &[Pair]) -> Result<PriceMap, AggregatorError>;

    /// Best bid/ask, only for pairs with both sides `> 0`.
    async fn quotes_for_pairs(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError>;
}

/// Shared REST transport for the exchange clients.
#[async_trait]
pub trait HttpExchange: Send + Sync {
    // Exchange specific methods
    fn api_base(&self) -> &str;
    fn client(&self) -> &reqwest::Client;
    fn http_config(&self) -> &HttpConfig;
    fn exchange_name(&self) -> &str;

    // Default implementations
    async fn get<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AggregatorError> {
        let url = format!(
            "{}/{}",
            self.api_base(),
            endpoint.trim_start_matches('/')
        );
        let retry_times = self.http_config().retry_times;
        let mut attempt: u32 = 0;

        loop {
            match self.get_once(&url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < retry_times => {
                    attempt += 1;
                    tracing::debug!(
                        exchange = %self.exchange_name(),
                        url = %url,
                        attempt,
                        error = %e,
                        "retrying request"
                    );
                    tokio::time::sleep(self.http_config().retry_sleep()).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once<T: DeserializeOwned + Send>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AggregatorError> {
        let response = self.client().get(url).query(query).send().await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AggregatorError::ApiError(format!(
                "{} API error: {} - {}",
                self.exchange_name(),
                status,
                error_text
            )));
        }

        Ok(response.json().await?)
    }
}

/// Per-venue fetchers. These may fail; [`ExchangeClient`] is derived from
/// them with failures logged and degraded to empty results.
#[async_trait]
pub trait CEXTrait: HttpExchange {
    fn exchange(&self) -> CexExchange;
    fn normalizer(&self) -> &PairNormalizer;
    fn price_cache(&self) -> &CacheStore<PriceMap>;

    async fn fetch_pairs(&self) -> Result<Vec<Pair>, AggregatorError>;

    /// Full last-price table for every market the venue reports.
    async fn fetch_price_table(&self) -> Result<PriceMap, AggregatorError>;

    async fn fetch_quotes(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError>;
}

#[async_trait]
impl<T: CEXTrait> ExchangeClient for T {
    fn code(&self) -> &str {
        self.exchange().code()
    }

    fn name(&self) -> &str {
        self.exchange().name()
    }

    async fn list_pairs(&self) -> Result<Vec<Pair>, AggregatorError> {
        let mut pairs = match self.fetch_pairs().await {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::warn!(exchange = %self.code(), error = %e, "listing pairs failed");
                return Ok(Vec::new());
            }
        };
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }

    async fn prices_for_pairs(&self, pairs: &[Pair]) -> Result<PriceMap, AggregatorError> {
        if pairs.is_empty() {
            return Ok(PriceMap::new());
        }

        let key = CacheKeys::prices(self.code());
        let table = match self.price_cache().get(&key).await {
            Some(table) => table,
            None => match self.fetch_price_table().await {
                Ok(table) => {
                    self.price_cache().put(key, table.clone()).await;
                    table
                }
                Err(e) => {
                    tracing::warn!(exchange = %self.code(), error = %e, "bulk price fetch failed");
                    return Ok(PriceMap::new());
                }
            },
        };

        Ok(pairs
            .iter()
            .filter_map(|pair| {
                table
                    .get(pair)
                    .filter(|price| **price > 0.0)
                    .map(|price| (pair.clone(), *price))
            })
            .collect())
    }

    async fn quotes_for_pairs(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        if pairs.is_empty() {
            return Ok(QuoteMap::new());
        }

        match self.fetch_quotes(pairs).await {
            Ok(quotes) => Ok(quotes
                .into_iter()
                .filter(|(_, quote)| quote.is_valid())
                .collect()),
            Err(e) => {
                tracing::warn!(exchange = %self.code(), error = %e, "bulk quote fetch failed");
                Ok(QuoteMap::new())
            }
        }
    }
}

/// Everything a client needs besides its own endpoints.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub http: HttpConfig,
    pub normalizer: Arc<PairNormalizer>,
    pub prices_ttl: Duration,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            normalizer: Arc::new(PairNormalizer::default()),
            prices_ttl: Duration::from_secs(3),
        }
    }
}

// CEX MACRO EXPORTS
#[macro_export]
macro_rules! create_exchange {
    (
        $struct_name:ident, $variant:ident
    ) => {
        pub struct $struct_name {
            client: reqwest::Client,
            api_base: String,
            http: $crate::common::HttpConfig,
            normalizer: std::sync::Arc<$crate::common::PairNormalizer>,
            prices: $crate::common::CacheStore<$crate::common::PriceMap>,
        }

        impl $struct_name {
            pub const EXCHANGE: $crate::common::CexExchange = $crate::common::CexExchange::$variant;

            pub fn new(
                ctx: &$crate::common::ClientContext,
            ) -> Result<Self, $crate::common::AggregatorError> {
                Self::with_base_url(ctx, Self::EXCHANGE.default_base_url())
            }

            pub fn with_base_url(
                ctx: &$crate::common::ClientContext,
                base_url: &str,
            ) -> Result<Self, $crate::common::AggregatorError> {
                Ok(Self {
                    client: $crate::common::create_http_client(&ctx.http)?,
                    api_base: base_url.trim_end_matches('/').to_string(),
                    http: ctx.http.clone(),
                    normalizer: ctx.normalizer.clone(),
                    prices: $crate::common::CacheStore::new(ctx.prices_ttl),
                })
            }
        }

        impl $crate::common::HttpExchange for $struct_name {
            fn api_base(&self) -> &str {
                &self.api_base
            }

            fn client(&self) -> &reqwest::Client {
                &self.client
            }

            fn http_config(&self) -> &$crate::common::HttpConfig {
                &self.http
            }

            fn exchange_name(&self) -> &str {
                Self::EXCHANGE.name()
            }
        }
    };
}
