use serde::Deserialize;

/// Envelope of every Bybit v5 response.
#[derive(Debug, Deserialize)]
pub struct BybitResponse {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: Option<BybitTickerList>,
}

#[derive(Debug, Deserialize)]
pub struct BybitTickerList {
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
}

/// Spot ticker row (`category=spot`).
#[derive(Debug, Deserialize)]
pub struct BybitTickerData {
    pub symbol: String,
    #[serde(rename = "lastPrice", default)]
    pub last_price: Option<String>,
    #[serde(rename = "bid1Price", default)]
    pub bid1_price: Option<String>,
    #[serde(rename = "ask1Price", default)]
    pub ask1_price: Option<String>,
}
