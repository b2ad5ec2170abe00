//! Smoke tests against the real public APIs. Run with `cargo test -- --ignored`.

use aeon_rate_aggregator::{
    Aggregator, Binance, Bybit, ClientContext, Config, ExchangeClient, PairNormalizer, Poloniex,
    Whitebit,
};

async fn check_client<T: ExchangeClient>(client: &T) {
    let btc = PairNormalizer::default().normalize("BTC/USDT").unwrap();

    let pairs = client.list_pairs().await.unwrap();
    println!("{}: {} pairs", client.name(), pairs.len());
    assert!(!pairs.is_empty(), "{} should list pairs", client.name());
    assert!(pairs.contains(&btc), "{} should list BTC/USDT", client.name());

    let quotes = client.quotes_for_pairs(&[btc.clone()]).await.unwrap();
    let quote = quotes.get(&btc).expect("BTC/USDT quote");
    println!("   Bid: {} Ask: {}", quote.bid, quote.ask);
    assert!(quote.bid > 0.0, "Bid price should be positive");
    assert!(quote.ask > 0.0, "Ask price should be positive");

    let prices = client.prices_for_pairs(&[btc.clone()]).await.unwrap();
    let last = prices.get(&btc).expect("BTC/USDT last price");
    println!("   Last: {}", last);
    assert!(*last > 0.0, "Last price should be positive");
}

#[tokio::test]
#[ignore = "hits the live Binance API"]
async fn test_binance_live() {
    check_client(&Binance::new(&ClientContext::default()).unwrap()).await;
}

#[tokio::test]
#[ignore = "hits the live Bybit API"]
async fn test_bybit_live() {
    check_client(&Bybit::new(&ClientContext::default()).unwrap()).await;
}

#[tokio::test]
#[ignore = "hits the live WhiteBIT API"]
async fn test_whitebit_live() {
    check_client(&Whitebit::new(&ClientContext::default()).unwrap()).await;
}

#[tokio::test]
#[ignore = "hits the live Poloniex API"]
async fn test_poloniex_live() {
    check_client(&Poloniex::new(&ClientContext::default()).unwrap()).await;
}

#[tokio::test]
#[ignore = "hits every live exchange API"]
async fn test_aggregator_live() {
    let aggregator = Aggregator::from_config(&Config::default()).unwrap();

    let pairs = aggregator.common_pairs().await;
    println!("{} common pairs", pairs.len());
    assert!(!pairs.is_empty());

    let rate = aggregator.best_rate("BTC/USDT").await.unwrap();
    println!(
        "BTC/USDT buy {} @ {} | sell {} @ {}",
        rate.buy().exchange(),
        rate.buy().price(),
        rate.sell().exchange(),
        rate.sell().price()
    );
    assert!(rate.quotes().len() >= 2);

    let opportunities = aggregator.arbitrage(5, 0.0).await;
    assert!(opportunities.len() <= 5);
    for opp in &opportunities {
        println!(
            "  {} {} -> {} | {:.4}%",
            opp.pair(),
            opp.buy_exchange(),
            opp.sell_exchange(),
            opp.profit_percent()
        );
        assert!(opp.profit_percent() <= Config::default().arbitrage.max_profit_percent);
    }
}
