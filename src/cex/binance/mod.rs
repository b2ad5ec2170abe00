mod types;

use crate::cex::need_set;
use crate::common::{
    AggregatorError, BidAsk, CEXTrait, CacheStore, CexExchange, HttpExchange, Pair,
    PairNormalizer, PriceMap, QuoteMap, parse_rows, positive_f64,
};
use crate::create_exchange;
use async_trait::async_trait;
use std::collections::HashSet;
use types::{BinanceBookTicker, BinanceTickerPrice};

const TICKER_PRICE: &str = "api/v3/ticker/price";
const BOOK_TICKER: &str = "api/v3/ticker/bookTicker";

create_exchange!(Binance, Binance);

#[async_trait]
impl CEXTrait for Binance {
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
        let rows: Vec<serde_json::Value> = self.get(TICKER_PRICE, &[]).await?;
        let tickers: Vec<BinanceTickerPrice> = parse_rows(rows);

        Ok(self
            .normalizer()
            .normalize_all(tickers.iter().map(|t| t.symbol.as_str())))
    }

    async fn fetch_price_table(&self) -> Result<PriceMap, AggregatorError> {
        let rows: Vec<serde_json::Value> = self.get(TICKER_PRICE, &[]).await?;
        Ok(price_table(parse_rows(rows), self.normalizer()))
    }

    async fn fetch_quotes(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        // One bulk call covers every symbol; filter locally.
        let rows: Vec<serde_json::Value> = self.get(BOOK_TICKER, &[]).await?;
        Ok(book_quotes(
            parse_rows(rows),
            &need_set(pairs),
            self.normalizer(),
        ))
    }
}

fn price_table(rows: Vec<BinanceTickerPrice>, normalizer: &PairNormalizer) -> PriceMap {
    rows.into_iter()
        .filter_map(|row| {
            let pair = normalizer.normalize(&row.symbol)?;
            let price = positive_f64(row.price.as_deref())?;
            Some((pair, price))
        })
        .collect()
}

fn book_quotes(
    rows: Vec<BinanceBookTicker>,
    need: &HashSet<&Pair>,
    normalizer: &PairNormalizer,
) -> QuoteMap {
    rows.into_iter()
        .filter_map(|row| {
            let pair = normalizer.normalize(&row.symbol)?;
            if !need.contains(&pair) {
                return None;
            }
            let bid = positive_f64(row.bid_price.as_deref())?;
            let ask = positive_f64(row.ask_price.as_deref())?;
            Some((pair, BidAsk::new(bid, ask)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PairNormalizer {
        PairNormalizer::default()
    }

    #[test]
    fn price_table_splits_concatenated_symbols() {
        let rows: Vec<BinanceTickerPrice> = parse_rows(
            serde_json::from_str(
                r#"[
                    {"symbol": "BTCUSDT", "price": "64000.10"},
                    {"symbol": "ETHBTC", "price": "0.052"},
                    {"symbol": "ZEROUSDT", "price": "0.00000000"},
                    {"symbol": "WEIRD", "price": "1.0"}
                ]"#,
            )
            .unwrap(),
        );

        let table = price_table(rows, &normalizer());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("BTC/USDT"), Some(&64000.10));
        assert_eq!(table.get("ETH/BTC"), Some(&0.052));
    }

    #[test]
    fn book_quotes_keep_only_requested_valid_pairs() {
        let rows: Vec<BinanceBookTicker> = parse_rows(
            serde_json::from_str(
                r#"[
                    {"symbol": "BTCUSDT", "bidPrice": "100.0", "bidQty": "1", "askPrice": "101.0", "askQty": "1"},
                    {"symbol": "ETHUSDT", "bidPrice": "0.0", "bidQty": "0", "askPrice": "3000.0", "askQty": "1"},
                    {"symbol": "SOLUSDT", "bidPrice": "150.0", "bidQty": "1", "askPrice": "151.0", "askQty": "1"}
                ]"#,
            )
            .unwrap(),
        );

        let n = normalizer();
        let wanted = n.normalize_all(["BTC/USDT", "ETH/USDT"]);
        let quotes = book_quotes(rows, &need_set(&wanted), &n);

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes.get("BTC/USDT"), Some(&BidAsk::new(100.0, 101.0)));
    }
}
