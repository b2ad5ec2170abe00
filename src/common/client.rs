use crate::common::AggregatorError;
use crate::common::config::HttpConfig;

const USER_AGENT: &str = concat!("aeon-rate-aggregator/", env!("CARGO_PKG_VERSION"));

pub fn create_http_client(http: &HttpConfig) -> Result<reqwest::Client, AggregatorError> {
    let client = reqwest::Client::builder()
        .timeout(http.timeout())
        .connect_timeout(http.connect_timeout())
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
