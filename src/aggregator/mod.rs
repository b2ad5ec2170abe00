use crate::cex::build_clients;
use crate::common::{
    AggregatorConfig, AggregatorError, BidAsk, CacheKeys, CacheStore, Config, ExchangeClient,
    FLOATING_POINT_EPSILON, MIN_EXCHANGES_REQUIRED, MIN_QUOTES_REQUIRED, Pair, PairNormalizer,
    QuoteMap,
};
use futures::future::{join_all, try_join_all};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

mod types;
pub use types::{ArbitrageOpportunity, BestRateResult, ExchangeQuote, Quote};

/// Number of opportunities returned when the caller does not ask for a limit.
pub const DEFAULT_ARBITRAGE_LIMIT: usize = 20;

/// Rate aggregator - finds common pairs, best rates and arbitrage across a
/// fixed set of exchange clients.
///
/// Clients are queried concurrently. An exchange that errors is treated as
/// having no data; only [`Aggregator::best_rate`] surfaces typed failures.
pub struct Aggregator {
    clients: Vec<Arc<dyn ExchangeClient>>,
    config: AggregatorConfig,
    normalizer: Arc<PairNormalizer>,
    pairs_cache: CacheStore<Vec<Pair>>,
}

/// One exchange's quotes for a batch of pairs.
type Book<'a> = (&'a dyn ExchangeClient, QuoteMap);

impl Aggregator {
    /// Creates an aggregator over `clients`, kept in the given order.
    ///
    /// # Arguments
    /// * `clients` - Exchange clients; order decides ties
    /// * `config` - Validated before use
    /// * `normalizer` - Used to resolve user-supplied pairs
    pub fn new(
        clients: Vec<Arc<dyn ExchangeClient>>,
        config: AggregatorConfig,
        normalizer: Arc<PairNormalizer>,
    ) -> Result<Self, AggregatorError> {
        config.validate()?;

        Ok(Self {
            pairs_cache: CacheStore::new(config.pairs_ttl),
            clients,
            config,
            normalizer,
        })
    }

    /// Builds the enabled exchange clients from `config` and wires them in.
    pub fn from_config(config: &Config) -> Result<Self, AggregatorError> {
        config.validate()?;

        let normalizer = Arc::new(config.normalizer());
        let clients = build_clients(config, normalizer.clone())?;
        let codes: Vec<&str> = clients.iter().map(|c| c.code()).collect();
        info!(exchanges = ?codes, "aggregator configured");

        Self::new(clients, config.aggregator(), normalizer)
    }

    pub fn clients(&self) -> &[Arc<dyn ExchangeClient>] {
        &self.clients
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &PairNormalizer {
        &self.normalizer
    }

    /// Pairs listed by every contributing exchange, sorted.
    ///
    /// Served from cache while fresh. An intersection is cached even when it
    /// is empty; too few contributing exchanges is not cached so the next call
    /// retries them.
    pub async fn common_pairs(&self) -> Vec<Pair> {
        let key = CacheKeys::common_pairs();

        if let Some(pairs) = self.pairs_cache.get(&key).await {
            debug!(pairs = pairs.len(), "common pairs served from cache");
            return pairs;
        }

        match self.compute_common_pairs().await {
            Some(pairs) => {
                self.pairs_cache.put(key, pairs.clone()).await;
                pairs
            }
            None => Vec::new(),
        }
    }

    /// Drops the cached common-pair set.
    pub async fn refresh_common_pairs(&self) {
        self.pairs_cache.clear().await;
    }

    /// `None` when too few exchanges contributed to intersect.
    async fn compute_common_pairs(&self) -> Option<Vec<Pair>> {
        // Fetch all listings in parallel
        let fetches = self.clients.iter().map(|client| async move {
            let code = client.code();
            match client.list_pairs().await {
                Ok(pairs) if !pairs.is_empty() => Ok((code, pairs)),
                Ok(_) => {
                    warn!(exchange = %code, "exchange returned no pairs");
                    Err(code)
                }
                Err(e) => {
                    warn!(exchange = %code, error = %e, "listing pairs failed");
                    Err(code)
                }
            }
        });

        let listings: Vec<(&str, Vec<Pair>)> = if self.config.require_all_exchanges {
            // First empty exchange aborts; in-flight requests are dropped
            match try_join_all(fetches).await {
                Ok(listings) => listings,
                Err(code) => {
                    warn!(
                        exchange = %code,
                        "all exchanges are required and one has no pairs"
                    );
                    return None;
                }
            }
        } else {
            join_all(fetches)
                .await
                .into_iter()
                .filter_map(Result::ok)
                .collect()
        };

        let available: Vec<&str> = listings.iter().map(|(code, _)| *code).collect();
        if listings.len() < MIN_EXCHANGES_REQUIRED {
            warn!(
                available = ?available,
                required = MIN_EXCHANGES_REQUIRED,
                "not enough exchanges returned pairs"
            );
            return None;
        }

        let ((_, first), rest) = listings.split_first()?;

        let mut common = first.clone();
        for (_, pairs) in rest {
            let listed: HashSet<&Pair> = pairs.iter().collect();
            common.retain(|pair| listed.contains(pair));
        }
        common.sort();
        common.dedup();

        info!(
            pairs_count = common.len(),
            exchanges = ?available,
            "common pairs computed"
        );
        Some(common)
    }

    /// Cheapest ask and richest bid for one pair across all exchanges.
    ///
    /// # Arguments
    /// * `pair` - Any accepted spelling (`btc-usdt`, `BTCUSDT`, `BTC/USDT`)
    ///
    /// # Errors
    /// * `PairNotFound` - the pair does not resolve or is not a common pair
    /// * `InsufficientQuotes` - fewer than two exchanges quoted it
    pub async fn best_rate(&self, pair: &str) -> Result<BestRateResult, AggregatorError> {
        let pair = self.resolve_pair(pair).await?;
        let books = self.fetch_books(std::slice::from_ref(&pair), true).await;

        let mut collected: Vec<(&dyn ExchangeClient, Quote)> = Vec::new();
        for (client, book) in &books {
            let Some(bid_ask) = book.get(&pair).filter(|q| q.is_valid()) else {
                continue;
            };

            match Quote::new(bid_ask.bid, bid_ask.ask, pair.clone(), client.code()) {
                Ok(quote) => collected.push((*client, quote)),
                Err(e) => {
                    warn!(exchange = %client.code(), pair = %pair, error = %e, "quote discarded");
                }
            }
        }

        if collected.len() < MIN_QUOTES_REQUIRED {
            return Err(AggregatorError::InsufficientQuotes {
                pair: pair.to_string(),
                required: MIN_QUOTES_REQUIRED,
                actual: collected.len(),
            });
        }

        // Strict comparisons: on ties the earlier client keeps the side
        let mut cheapest = &collected[0];
        let mut richest = &collected[0];
        for candidate in &collected[1..] {
            if candidate.1.ask() < cheapest.1.ask() {
                cheapest = candidate;
            }
            if candidate.1.bid() > richest.1.bid() {
                richest = candidate;
            }
        }

        let buy = ExchangeQuote::new(cheapest.0.name(), cheapest.1.ask())?;
        let sell = ExchangeQuote::new(richest.0.name(), richest.1.bid())?;

        info!(
            pair = %pair,
            buy_exchange = %buy.exchange(),
            buy_price = buy.price(),
            sell_exchange = %sell.exchange(),
            sell_price = sell.price(),
            quotes = collected.len(),
            "best rate resolved"
        );

        let quotes = collected.into_iter().map(|(_, quote)| quote).collect();
        Ok(BestRateResult::new(pair, buy, sell, quotes))
    }

    /// Cross-exchange spreads over all common pairs, most profitable first.
    ///
    /// # Arguments
    /// * `limit` - Maximum results; values below 1 are raised to 1
    /// * `min_profit` - Minimum profit percentage to keep
    ///
    /// # Returns
    /// At most one opportunity per pair: buy at the lowest ask, sell at the
    /// highest bid, on two different exchanges, capped by
    /// `max_profit_percent`.
    pub async fn arbitrage(&self, limit: usize, min_profit: f64) -> Vec<ArbitrageOpportunity> {
        let pairs = self.common_pairs().await;
        if pairs.is_empty() {
            debug!("no common pairs to scan");
            return Vec::new();
        }

        let books = self.fetch_books(&pairs, self.config.use_bid_ask).await;
        let max_profit = self.config.max_profit_percent;

        let mut opportunities: Vec<ArbitrageOpportunity> = pairs
            .iter()
            .filter_map(|pair| Self::spread_for(pair, &books, min_profit, max_profit))
            .collect();

        // Sort by profitability (most profitable first)
        opportunities.sort_by(|a, b| {
            b.profit_percent()
                .partial_cmp(&a.profit_percent())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        opportunities.truncate(limit.max(1));

        info!(
            pairs = pairs.len(),
            opportunities = opportunities.len(),
            use_bid_ask = self.config.use_bid_ask,
            "arbitrage scan finished"
        );
        opportunities
    }

    /// Best cross-exchange spread for one pair, if it clears the thresholds.
    fn spread_for(
        pair: &Pair,
        books: &[Book<'_>],
        min_profit: f64,
        max_profit: f64,
    ) -> Option<ArbitrageOpportunity> {
        let mut min_ask: Option<(&dyn ExchangeClient, f64)> = None;
        let mut max_bid: Option<(&dyn ExchangeClient, f64)> = None;

        for (client, book) in books {
            let Some(quote) = book.get(pair).filter(|q| q.is_valid()) else {
                continue;
            };

            if min_ask.is_none_or(|(_, ask)| quote.ask < ask) {
                min_ask = Some((*client, quote.ask));
            }
            if max_bid.is_none_or(|(_, bid)| quote.bid > bid) {
                max_bid = Some((*client, quote.bid));
            }
        }

        let ((buyer, ask), (seller, bid)) = (min_ask?, max_bid?);
        if buyer.code() == seller.code() || bid <= ask {
            return None;
        }

        let profit = (bid - ask) / ask * 100.0;
        if profit + FLOATING_POINT_EPSILON < min_profit || profit > max_profit {
            debug!(pair = %pair, profit, "spread outside thresholds");
            return None;
        }

        match ArbitrageOpportunity::new(pair.clone(), buyer.name(), ask, seller.name(), bid, profit)
        {
            Ok(opportunity) => Some(opportunity),
            Err(e) => {
                warn!(pair = %pair, error = %e, "opportunity discarded");
                None
            }
        }
    }

    async fn resolve_pair(&self, raw: &str) -> Result<Pair, AggregatorError> {
        let pair = self
            .normalizer
            .normalize(raw)
            .ok_or_else(|| AggregatorError::PairNotFound {
                pair: raw.trim().to_ascii_uppercase(),
            })?;

        if !self.common_pairs().await.contains(&pair) {
            return Err(AggregatorError::PairNotFound {
                pair: pair.to_string(),
            });
        }

        Ok(pair)
    }

    /// Fetches a book from every client in parallel, keeping client order.
    ///
    /// With `use_bid_ask` off, last prices stand in for both sides.
    async fn fetch_books<'a>(&'a self, pairs: &[Pair], use_bid_ask: bool) -> Vec<Book<'a>> {
        let fetches = self.clients.iter().map(move |client| async move {
            let client: &dyn ExchangeClient = client.as_ref();
            let book = if use_bid_ask {
                Self::quotes_from(client, pairs).await
            } else {
                Self::last_prices_from(client, pairs).await
            };
            (client, book)
        });

        join_all(fetches).await
    }

    async fn quotes_from(client: &dyn ExchangeClient, pairs: &[Pair]) -> QuoteMap {
        match client.quotes_for_pairs(pairs).await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(exchange = %client.code(), error = %e, "quote fetch failed");
                QuoteMap::new()
            }
        }
    }

    async fn last_prices_from(client: &dyn ExchangeClient, pairs: &[Pair]) -> QuoteMap {
        match client.prices_for_pairs(pairs).await {
            Ok(prices) => prices
                .into_iter()
                .map(|(pair, last)| (pair, BidAsk::new(last, last)))
                .collect(),
            Err(e) => {
                warn!(exchange = %client.code(), error = %e, "price fetch failed");
                QuoteMap::new()
            }
        }
    }
}
