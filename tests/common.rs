// Allow dead code warnings since different test files use different items from this module
#![allow(dead_code)]

use aeon_rate_aggregator::{
    Aggregator, AggregatorConfig, AggregatorError, BidAsk, ExchangeClient, Pair, PairNormalizer,
    PriceMap, QuoteMap,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Parses a test pair, panicking on anything the default normalizer rejects.
pub fn pair(symbol: &str) -> Pair {
    PairNormalizer::default()
        .normalize(symbol)
        .unwrap_or_else(|| panic!("test pair '{}' should normalize", symbol))
}

/// How a mock answers each call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Normal,
    /// Every call returns `Err(ApiError)`.
    Fail,
    /// Lists pairs but fails every price and quote call.
    FailQuotes,
    /// `list_pairs` never completes.
    Stall,
    /// Every call gives up with an error once the mock's delay has passed,
    /// like a request hitting its own HTTP timeout.
    TimeOut,
}

/// In-process exchange with scripted pairs, quotes and last prices.
pub struct MockExchange {
    code: &'static str,
    name: &'static str,
    pairs: Vec<Pair>,
    quotes: QuoteMap,
    prices: PriceMap,
    behavior: Behavior,
    delay: Duration,
    completed_calls: AtomicUsize,
    list_calls: AtomicUsize,
    quote_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl MockExchange {
    pub fn new(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            pairs: Vec::new(),
            quotes: QuoteMap::new(),
            prices: PriceMap::new(),
            behavior: Behavior::Normal,
            delay: Duration::ZERO,
            completed_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
        }
    }

    pub fn binance() -> Self {
        Self::new("binance", "Binance")
    }

    pub fn bybit() -> Self {
        Self::new("bybit", "Bybit")
    }

    pub fn whitebit() -> Self {
        Self::new("whitebit", "WhiteBIT")
    }

    pub fn poloniex() -> Self {
        Self::new("poloniex", "Poloniex")
    }

    pub fn with_pairs(mut self, symbols: &[&str]) -> Self {
        self.pairs.extend(symbols.iter().map(|s| pair(s)));
        self
    }

    /// Adds a quote and lists the pair.
    pub fn with_quote(mut self, symbol: &str, bid: f64, ask: f64) -> Self {
        let p = pair(symbol);
        if !self.pairs.contains(&p) {
            self.pairs.push(p.clone());
        }
        self.quotes.insert(p, BidAsk::new(bid, ask));
        self
    }

    /// Adds a last price and lists the pair.
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        let p = pair(symbol);
        if !self.pairs.contains(&p) {
            self.pairs.push(p.clone());
        }
        self.prices.insert(p, price);
        self
    }

    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    pub fn failing_quotes(mut self) -> Self {
        self.behavior = Behavior::FailQuotes;
        self
    }

    pub fn stalled(mut self) -> Self {
        self.behavior = Behavior::Stall;
        self
    }

    /// Every call sleeps for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call fails after `after`.
    pub fn timing_out(mut self, after: Duration) -> Self {
        self.behavior = Behavior::TimeOut;
        self.delay = after;
        self
    }

    /// Calls that ran to the end, whatever they returned.
    pub fn completed_calls(&self) -> usize {
        self.completed_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    fn failure(&self) -> AggregatorError {
        AggregatorError::ApiError(format!("{} API error: 503 - unavailable", self.name))
    }

    /// Waits out the delay, then reports whether the call should fail.
    async fn respond(&self, quotes: bool) -> Result<(), AggregatorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed_calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Fail | Behavior::TimeOut => Err(self.failure()),
            Behavior::FailQuotes if quotes => Err(self.failure()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    fn code(&self) -> &str {
        self.code
    }

    fn name(&self) -> &str {
        self.name
    }

    async fn list_pairs(&self) -> Result<Vec<Pair>, AggregatorError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.behavior == Behavior::Stall {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.respond(false).await?;
        Ok(self.pairs.clone())
    }

    async fn prices_for_pairs(&self, pairs: &[Pair]) -> Result<PriceMap, AggregatorError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(true).await?;
        Ok(pairs
            .iter()
            .filter_map(|p| self.prices.get(p).map(|price| (p.clone(), *price)))
            .collect())
    }

    async fn quotes_for_pairs(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(true).await?;
        Ok(pairs
            .iter()
            .filter_map(|p| self.quotes.get(p).map(|quote| (p.clone(), *quote)))
            .collect())
    }
}

/// Default settings with the given common-pair TTL.
pub fn config_with_ttl(pairs_ttl: Duration) -> AggregatorConfig {
    AggregatorConfig {
        pairs_ttl,
        ..AggregatorConfig::default()
    }
}

/// Wires mocks into an aggregator, keeping their order.
pub fn aggregator_with(mocks: &[Arc<MockExchange>], config: AggregatorConfig) -> Aggregator {
    let clients: Vec<Arc<dyn ExchangeClient>> = mocks
        .iter()
        .map(|m| m.clone() as Arc<dyn ExchangeClient>)
        .collect();
    Aggregator::new(clients, config, Arc::new(PairNormalizer::default()))
        .expect("test config should be valid")
}

pub fn aggregator(mocks: &[Arc<MockExchange>]) -> Aggregator {
    aggregator_with(mocks, AggregatorConfig::default())
}

/// The three-exchange BTC/USDT book used across the suites.
pub fn btc_book() -> Vec<Arc<MockExchange>> {
    vec![
        Arc::new(MockExchange::binance().with_quote("BTC/USDT", 100.0, 101.0)),
        Arc::new(MockExchange::bybit().with_quote("BTC/USDT", 99.0, 102.0)),
        Arc::new(MockExchange::poloniex().with_quote("BTC/USDT", 103.0, 104.0)),
    ]
}
