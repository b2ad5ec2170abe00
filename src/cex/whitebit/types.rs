use serde::Deserialize;
use serde_json::Value;

/// Row of `GET /api/v4/public/markets`.
#[derive(Debug, Deserialize)]
pub struct WhitebitMarket {
    /// `BTC_USDT`
    pub name: String,
    #[serde(rename = "isActive", alias = "is_active", default)]
    pub is_active: Option<bool>,
}

/// Value in the `GET /api/v4/public/ticker` object, keyed by market name.
#[derive(Debug, Deserialize)]
pub struct WhitebitTicker {
    #[serde(alias = "lastPrice", alias = "last", default)]
    pub last_price: Option<Value>,
}

/// `GET /api/v4/public/orderbook/{market}`; levels are `[price, amount]`.
#[derive(Debug, Deserialize)]
pub struct WhitebitOrderBook {
    #[serde(default)]
    pub bids: Vec<Vec<Value>>,
    #[serde(default)]
    pub asks: Vec<Vec<Value>>,
}

/// `GET /api/v2/public/ticker`.
#[derive(Debug, Deserialize)]
pub struct WhitebitBookTickers {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub result: Vec<Value>,
}

/// Row of [`WhitebitBookTickers::result`].
#[derive(Debug, Deserialize)]
pub struct WhitebitBookTicker {
    /// `BTC_USDT`
    #[serde(rename = "tradingPairs")]
    pub trading_pairs: String,
    #[serde(rename = "highestBid", default)]
    pub highest_bid: Option<Value>,
    #[serde(rename = "lowestAsk", default)]
    pub lowest_ask: Option<Value>,
}
