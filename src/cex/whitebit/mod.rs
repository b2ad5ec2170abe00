mod types;

use crate::cex::need_set;
use crate::common::{
    AggregatorError, BidAsk, CEXTrait, CacheStore, CexExchange, HttpExchange, Pair,
    PairNormalizer, PriceMap, QuoteMap, parse_rows, value_f64,
};
use crate::create_exchange;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use types::{
    WhitebitBookTicker, WhitebitBookTickers, WhitebitMarket, WhitebitOrderBook, WhitebitTicker,
};

const MARKETS: &str = "api/v4/public/markets";
const TICKER: &str = "api/v4/public/ticker";
const ORDERBOOK: &str = "api/v4/public/orderbook";
const BOOK_TICKER: &str = "api/v2/public/ticker";

create_exchange!(Whitebit, Whitebit);

#[async_trait]
impl CEXTrait for Whitebit {
    fn exchange(&self) -> CexExchange {
        Self::EXCHANGE
    }

    fn normalizer(&self) -> &PairNormalizer {
        &self.normalizer
    }

    fn price_cache(&self) -> &CacheStore<PriceMap> {
        &self.prices
    }

    async fn fetch_pairs(&self) -> Result<Vec<Pair>, AggregatorError> {
        let rows: Vec<Value> = self.get(MARKETS, &[]).await?;
        Ok(active_pairs(parse_rows(rows), self.normalizer()))
    }

    async fn fetch_price_table(&self) -> Result<PriceMap, AggregatorError> {
        let tickers: HashMap<String, Value> = self.get(TICKER, &[]).await?;
        Ok(price_table(tickers, self.normalizer()))
    }

    /// A single pair reads the top of its order book. Several pairs share one
    /// bulk ticker call carrying best bid and ask per market.
    async fn fetch_quotes(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        if let [pair] = pairs {
            let endpoint = format!("{}/{}", ORDERBOOK, pair.to_market("_"));
            let book: WhitebitOrderBook = self.get(&endpoint, &[("limit", "1")]).await?;

            let mut quotes = QuoteMap::new();
            match top_of_book(&book) {
                Some(quote) => {
                    quotes.insert(pair.clone(), quote);
                }
                None => {
                    tracing::debug!(exchange = %self.exchange().code(), pair = %pair, "empty order book");
                }
            }
            return Ok(quotes);
        }

        let response: WhitebitBookTickers = self.get(BOOK_TICKER, &[]).await?;
        if response.success == Some(false) {
            return Err(AggregatorError::ApiError(format!(
                "WhiteBIT API error: {}",
                response.message.unwrap_or_default()
            )));
        }

        let rows: Vec<WhitebitBookTicker> = parse_rows(response.result);
        let quotes = book_quotes(rows, &need_set(pairs), self.normalizer());
        if quotes.len() < pairs.len() {
            tracing::debug!(
                exchange = %self.exchange().code(),
                requested = pairs.len(),
                quoted = quotes.len(),
                "some pairs have no bid/ask"
            );
        }
        Ok(quotes)
    }
}

fn active_pairs(markets: Vec<WhitebitMarket>, normalizer: &PairNormalizer) -> Vec<Pair> {
    normalizer.normalize_all(
        markets
            .iter()
            .filter(|m| m.is_active.unwrap_or(true))
            .map(|m| m.name.as_str()),
    )
}

fn price_table(tickers: HashMap<String, Value>, normalizer: &PairNormalizer) -> PriceMap {
    tickers
        .into_iter()
        .filter_map(|(market, row)| {
            let pair = normalizer.normalize(&market)?;
            let ticker: WhitebitTicker = serde_json::from_value(row).ok()?;
            let price = value_f64(ticker.last_price.as_ref())?;
            Some((pair, price))
        })
        .collect()
}

fn book_quotes(
    rows: Vec<WhitebitBookTicker>,
    need: &HashSet<&Pair>,
    normalizer: &PairNormalizer,
) -> QuoteMap {
    rows.into_iter()
        .filter_map(|row| {
            let pair = normalizer.normalize(&row.trading_pairs)?;
            if !need.contains(&pair) {
                return None;
            }
            let bid = value_f64(row.highest_bid.as_ref())?;
            let ask = value_f64(row.lowest_ask.as_ref())?;
            Some((pair, BidAsk::new(bid, ask)))
        })
        .collect()
}

fn top_of_book(book: &WhitebitOrderBook) -> Option<BidAsk> {
    let bid = value_f64(book.bids.first()?.first())?;
    let ask = value_f64(book.asks.first()?.first())?;
    Some(BidAsk::new(bid, ask))
}
