pub mod binance;
pub mod bybit;
pub mod poloniex;
pub mod whitebit;

// Re-export
pub use binance::Binance;
pub use bybit::Bybit;
pub use poloniex::Poloniex;
pub use whitebit::Whitebit;

use crate::common::{
    AggregatorError, CexExchange, ClientContext, Config, ExchangeClient, Pair, PairNormalizer,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Builds the enabled clients once, in fixed exchange order, all sharing
/// `normalizer`.
pub fn build_clients(
    config: &Config,
    normalizer: Arc<PairNormalizer>,
) -> Result<Vec<Arc<dyn ExchangeClient>>, AggregatorError> {
    let ctx = ClientContext {
        http: config.http.clone(),
        normalizer,
        prices_ttl: config.cache.prices_ttl(),
    };

    config
        .exchanges
        .enabled()
        .into_iter()
        .map(|exchange| -> Result<Arc<dyn ExchangeClient>, AggregatorError> {
            let base_url = config.exchanges.base_url(&exchange);
            let client: Arc<dyn ExchangeClient> = match exchange {
                CexExchange::Binance => Arc::new(Binance::with_base_url(&ctx, &base_url)?),
                CexExchange::Bybit => Arc::new(Bybit::with_base_url(&ctx, &base_url)?),
                CexExchange::Whitebit => Arc::new(Whitebit::with_base_url(&ctx, &base_url)?),
                CexExchange::Poloniex => Arc::new(Poloniex::with_base_url(&ctx, &base_url)?),
            };
            Ok(client)
        })
        .collect()
}

pub(crate) fn need_set(pairs: &[Pair]) -> HashSet<&Pair> {
    pairs.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_clients_follows_enabled_flags_and_order() {
        let config = Config::from_toml_str(
            r#"
            [exchanges.bybit]
            enabled = false
            "#,
        )
        .unwrap();

        let clients = build_clients(&config, Arc::new(config.normalizer())).unwrap();
        let codes: Vec<&str> = clients.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["binance", "whitebit", "poloniex"]);

        let names: Vec<&str> = clients.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Binance", "WhiteBIT", "Poloniex"]);
    }

    #[test]
    fn build_clients_with_everything_disabled_is_empty() {
        let config = Config::from_toml_str(
            r#"
            [exchanges.binance]
            enabled = false
            [exchanges.bybit]
            enabled = false
            [exchanges.whitebit]
            enabled = false
            [exchanges.poloniex]
            enabled = false
            "#,
        )
        .unwrap();

        assert!(build_clients(&config, Arc::new(config.normalizer())).unwrap().is_empty());
    }
}
