use crate::common::{AggregatorError, Pair, is_price};
use serde::Serialize;

/// Bid/ask from one exchange for one pair.
///
/// Construction is the validation point: callers hand in already-sanitized
/// prices and a rejected quote is a hard error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    exchange: String,
    bid: f64,
    ask: f64,
    #[serde(skip)]
    pair: Pair,
}

impl Quote {
    pub fn new(
        bid: f64,
        ask: f64,
        pair: Pair,
        exchange: impl Into<String>,
    ) -> Result<Self, AggregatorError> {
        if !(is_price(bid) && is_price(ask)) {
            return Err(AggregatorError::InvalidValue(
                "Bid and ask must be finite and positive".to_string(),
            ));
        }

        if ask < bid {
            return Err(AggregatorError::InvalidValue(
                "Ask price cannot be less than bid price".to_string(),
            ));
        }

        Ok(Self {
            exchange: exchange.into(),
            bid,
            ask,
            pair,
        })
    }

    pub fn bid(&self) -> f64 {
        self.bid
    }

    pub fn ask(&self) -> f64 {
        self.ask
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    /// Exchange code that produced the quote.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }
}

/// One side of a best-rate answer: where, and at what price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeQuote {
    exchange: String,
    price: f64,
}

impl ExchangeQuote {
    pub fn new(exchange: impl Into<String>, price: f64) -> Result<Self, AggregatorError> {
        if !is_price(price) {
            return Err(AggregatorError::InvalidValue(
                "Price must be finite and positive".to_string(),
            ));
        }

        Ok(Self {
            exchange: exchange.into(),
            price,
        })
    }

    /// Exchange display name.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Cheapest place to buy (min ask) and best place to sell (max bid) for a
/// pair, plus every quote that was considered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestRateResult {
    pair: Pair,
    buy: ExchangeQuote,
    sell: ExchangeQuote,
    quotes: Vec<Quote>,
}

impl BestRateResult {
    pub fn new(pair: Pair, buy: ExchangeQuote, sell: ExchangeQuote, quotes: Vec<Quote>) -> Self {
        Self {
            pair,
            buy,
            sell,
            quotes,
        }
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn buy(&self) -> &ExchangeQuote {
        &self.buy
    }

    pub fn sell(&self) -> &ExchangeQuote {
        &self.sell
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

/// Buy on one exchange, sell on another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity {
    pair: Pair,
    buy_exchange: String,
    buy_price: f64,
    sell_exchange: String,
    sell_price: f64,
    /// `(sell_price - buy_price) / buy_price * 100`
    profit_percent: f64,
}

impl ArbitrageOpportunity {
    pub fn new(
        pair: Pair,
        buy_exchange: impl Into<String>,
        buy_price: f64,
        sell_exchange: impl Into<String>,
        sell_price: f64,
        profit_percent: f64,
    ) -> Result<Self, AggregatorError> {
        if !(is_price(buy_price) && is_price(sell_price)) {
            return Err(AggregatorError::InvalidValue(
                "Prices must be finite and positive".to_string(),
            ));
        }

        if !(profit_percent.is_finite() && profit_percent >= 0.0) {
            return Err(AggregatorError::InvalidValue(
                "Profit percent cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            pair,
            buy_exchange: buy_exchange.into(),
            buy_price,
            sell_exchange: sell_exchange.into(),
            sell_price,
            profit_percent,
        })
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn buy_exchange(&self) -> &str {
        &self.buy_exchange
    }

    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }

    pub fn sell_exchange(&self) -> &str {
        &self.sell_exchange
    }

    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }

    pub fn profit_percent(&self) -> f64 {
        self.profit_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PairNormalizer;

    fn btc_usdt() -> Pair {
        PairNormalizer::default().normalize("BTC/USDT").unwrap()
    }

    #[test]
    fn quote_rejects_non_positive_and_crossed_prices() {
        assert!(Quote::new(100.0, 101.0, btc_usdt(), "binance").is_ok());
        assert!(Quote::new(100.0, 100.0, btc_usdt(), "binance").is_ok());

        for (bid, ask) in [
            (0.0, 1.0),
            (1.0, 0.0),
            (-1.0, 2.0),
            (f64::NAN, 2.0),
            (1.0, f64::INFINITY),
        ] {
            assert!(
                matches!(
                    Quote::new(bid, ask, btc_usdt(), "binance"),
                    Err(AggregatorError::InvalidValue(_))
                ),
                "bid={} ask={} should be rejected",
                bid,
                ask
            );
        }

        match Quote::new(102.0, 101.0, btc_usdt(), "binance") {
            Err(AggregatorError::InvalidValue(msg)) => {
                assert_eq!(msg, "Ask price cannot be less than bid price")
            }
            other => panic!("expected crossed quote to fail, got {:?}", other),
        }
    }

    #[test]
    fn exchange_quote_requires_positive_price() {
        assert_eq!(ExchangeQuote::new("Binance", 1.5).unwrap().price(), 1.5);
        assert!(ExchangeQuote::new("Binance", 0.0).is_err());
        assert!(ExchangeQuote::new("Binance", f64::INFINITY).is_err());
    }

    #[test]
    fn opportunity_validates_prices_and_profit() {
        assert!(ArbitrageOpportunity::new(btc_usdt(), "A", 100.0, "B", 101.0, 1.0).is_ok());
        assert!(ArbitrageOpportunity::new(btc_usdt(), "A", 0.0, "B", 101.0, 1.0).is_err());
        assert!(ArbitrageOpportunity::new(btc_usdt(), "A", 100.0, "B", 101.0, -0.1).is_err());
        assert!(
            ArbitrageOpportunity::new(btc_usdt(), "A", 100.0, "B", f64::INFINITY, f64::INFINITY)
                .is_err()
        );
    }

    #[test]
    fn serialized_shapes() {
        let quote = Quote::new(100.0, 101.0, btc_usdt(), "binance").unwrap();
        let result = BestRateResult::new(
            btc_usdt(),
            ExchangeQuote::new("Binance", 101.0).unwrap(),
            ExchangeQuote::new("Poloniex", 103.0).unwrap(),
            vec![quote],
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "pair": "BTC/USDT",
                "buy": {"exchange": "Binance", "price": 101.0},
                "sell": {"exchange": "Poloniex", "price": 103.0},
                "quotes": [{"exchange": "binance", "bid": 100.0, "ask": 101.0}]
            })
        );

        let opportunity =
            ArbitrageOpportunity::new(btc_usdt(), "Binance", 101.0, "Poloniex", 103.0, 2.0)
                .unwrap();
        assert_eq!(
            serde_json::to_value(&opportunity).unwrap(),
            serde_json::json!({
                "pair": "BTC/USDT",
                "buy_exchange": "Binance",
                "buy_price": 101.0,
                "sell_exchange": "Poloniex",
                "sell_price": 103.0,
                "profit_percent": 2.0
            })
        );
    }
}
