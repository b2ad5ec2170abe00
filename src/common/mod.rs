pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod logging;
pub mod pair;
pub mod price;
pub mod utils;

// Re-export
pub use cache::{CacheKeys, CacheStore};
pub use client::create_http_client;
pub use config::{
    AggregatorConfig, ArbitrageConfig, CacheConfig, Config, ExchangeSettings, ExchangesConfig,
    FLOATING_POINT_EPSILON, HttpConfig, MIN_EXCHANGES_REQUIRED, MIN_QUOTES_REQUIRED,
};
pub use errors::AggregatorError;
pub use exchange::{CEXTrait, CexExchange, ClientContext, ExchangeClient, HttpExchange};
pub use logging::LoggingConfig;
pub use pair::{DEFAULT_QUOTE_CURRENCIES, Pair, PairNormalizer};
pub use price::{BidAsk, PriceMap, QuoteMap, is_price};
pub use utils::{parse_rows, positive_f64, value_f64};
