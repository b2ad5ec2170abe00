//! `aeon-rate-aggregator`
//!
//! Collect spot quotes from several centralized exchanges, work out which
//! pairs they all list, find the best buy/sell rate for a pair and scan for
//! cross-exchange arbitrage.
//!
//! ## Quickstart
//!
//! ```no_run
//! use aeon_rate_aggregator::{Aggregator, AggregatorError, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), AggregatorError> {
//! let aggregator = Aggregator::from_config(&Config::default())?;
//!
//! let rate = aggregator.best_rate("btc-usdt").await?;
//! println!(
//!     "{}: buy on {} at {}, sell on {} at {}",
//!     rate.pair(),
//!     rate.buy().exchange(),
//!     rate.buy().price(),
//!     rate.sell().exchange(),
//!     rate.sell().price()
//! );
//!
//! for opp in aggregator.arbitrage(5, 0.1).await {
//!     println!("{} {:.4}%", opp.pair(), opp.profit_percent());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cex;
pub mod common;

// Re-export common types
pub use aggregator::{
    Aggregator, ArbitrageOpportunity, BestRateResult, DEFAULT_ARBITRAGE_LIMIT, ExchangeQuote,
    Quote,
};

pub use cex::{Binance, Bybit, Poloniex, Whitebit, build_clients};

pub use common::{
    AggregatorConfig, AggregatorError, BidAsk, CEXTrait, CexExchange, ClientContext, Config,
    ExchangeClient, HttpExchange, LoggingConfig, Pair, PairNormalizer, PriceMap, QuoteMap,
};
