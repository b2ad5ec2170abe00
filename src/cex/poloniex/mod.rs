mod types;

use crate::cex::need_set;
use crate::common::{
    AggregatorError, BidAsk, CEXTrait, CacheStore, CexExchange, HttpExchange, Pair,
    PairNormalizer, PriceMap, QuoteMap, parse_rows, value_f64,
};
use crate::create_exchange;
use async_trait::async_trait;
use std::collections::HashSet;
use types::PoloniexTicker24h;

const TICKER_24H: &str = "markets/ticker24h";

create_exchange!(Poloniex, Poloniex);

impl Poloniex {
    async fn tickers(&self) -> Result<Vec<PoloniexTicker24h>, AggregatorError> {
        let rows: Vec<serde_json::Value> = self.get(TICKER_24H, &[]).await?;
        Ok(parse_rows(rows))
    }
}

#[async_trait]
impl CEXTrait for Poloniex {
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
        let tickers = self.tickers().await?;
        Ok(self
            .normalizer()
            .normalize_all(tickers.iter().map(|t| t.symbol.as_str())))
    }

    async fn fetch_price_table(&self) -> Result<PriceMap, AggregatorError> {
        let tickers = self.tickers().await?;
        let normalizer = self.normalizer();

        Ok(tickers
            .into_iter()
            .filter_map(|t| {
                let pair = normalizer.normalize(&t.symbol)?;
                let price = value_f64(t.close.as_ref())?;
                Some((pair, price))
            })
            .collect())
    }

    async fn fetch_quotes(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        let tickers = self.tickers().await?;
        Ok(ticker_quotes(tickers, &need_set(pairs), self.normalizer()))
    }
}

fn ticker_quotes(
    tickers: Vec<PoloniexTicker24h>,
    need: &HashSet<&Pair>,
    normalizer: &PairNormalizer,
) -> QuoteMap {
    tickers
        .into_iter()
        .filter_map(|t| {
            let pair = normalizer.normalize(&t.symbol)?;
            if !need.contains(&pair) {
                return None;
            }
            let bid = value_f64(t.bid.as_ref())?;
            let ask = value_f64(t.ask.as_ref())?;
            Some((pair, BidAsk::new(bid, ask)))
        })
        .collect()
}
