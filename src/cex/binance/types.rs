use serde::Deserialize;

/// Row of `GET /api/v3/ticker/price`.
#[derive(Debug, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    #[serde(default)]
    pub price: Option<String>,
}

/// Row of `GET /api/v3/ticker/bookTicker`.
#[derive(Debug, Deserialize)]
pub struct BinanceBookTicker {
    pub symbol: String,
    #[serde(rename = "bidPrice", default)]
    pub bid_price: Option<String>,
    #[serde(rename = "askPrice", default)]
    pub ask_price: Option<String>,
}
