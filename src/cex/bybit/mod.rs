mod types;

use crate::cex::bybit::types::{BybitResponse, BybitTickerData};
use crate::cex::need_set;
use crate::common::{
    AggregatorError, BidAsk, CEXTrait, CacheStore, CexExchange, HttpExchange, Pair,
    PairNormalizer, PriceMap, QuoteMap, parse_rows, positive_f64,
};
use crate::create_exchange;
use async_trait::async_trait;

const TICKERS: &str = "v5/market/tickers";
const SPOT: [(&str, &str); 1] = [("category", "spot")];

create_exchange!(Bybit, Bybit);

impl Bybit {
    /// Every spot ticker in one call; `retCode != 0` is an API error.
    async fn spot_tickers(&self) -> Result<Vec<BybitTickerData>, AggregatorError> {
        let response: BybitResponse = self.get(TICKERS, &SPOT).await?;
        unwrap_tickers(response)
    }
}

fn unwrap_tickers(response: BybitResponse) -> Result<Vec<BybitTickerData>, AggregatorError> {
    if response.ret_code != 0 {
        return Err(AggregatorError::ApiError(format!(
            "Bybit API error: {} - {}",
            response.ret_code, response.ret_msg
        )));
    }

    let list = response.result.map(|r| r.list).ok_or_else(|| {
        AggregatorError::ApiError("Bybit API returned invalid data format".to_string())
    })?;

    Ok(parse_rows(list))
}

#[async_trait]
impl CEXTrait for Bybit {
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
        let tickers = self.spot_tickers().await?;
        Ok(self
            .normalizer()
            .normalize_all(tickers.iter().map(|t| t.symbol.as_str())))
    }

    async fn fetch_price_table(&self) -> Result<PriceMap, AggregatorError> {
        let tickers = self.spot_tickers().await?;
        let normalizer = self.normalizer();

        Ok(tickers
            .into_iter()
            .filter_map(|t| {
                let pair = normalizer.normalize(&t.symbol)?;
                let price = positive_f64(t.last_price.as_deref())?;
                Some((pair, price))
            })
            .collect())
    }

    async fn fetch_quotes(&self, pairs: &[Pair]) -> Result<QuoteMap, AggregatorError> {
        let tickers = self.spot_tickers().await?;
        let normalizer = self.normalizer();
        let need = need_set(pairs);

        Ok(tickers
            .into_iter()
            .filter_map(|t| {
                let pair = normalizer.normalize(&t.symbol)?;
                if !need.contains(&pair) {
                    return None;
                }
                let bid = positive_f64(t.bid1_price.as_deref())?;
                let ask = positive_f64(t.ask1_price.as_deref())?;
                Some((pair, BidAsk::new(bid, ask)))
            })
            .collect())
    }
}
