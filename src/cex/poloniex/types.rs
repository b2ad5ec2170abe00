use serde::Deserialize;
use serde_json::Value;

/// Row of `GET /markets/ticker24h`.
#[derive(Debug, Deserialize)]
pub struct PoloniexTicker24h {
    /// `BTC_USDT`
    pub symbol: String,
    #[serde(default)]
    pub close: Option<Value>,
    #[serde(default)]
    pub bid: Option<Value>,
    #[serde(default)]
    pub ask: Option<Value>,
}
