use aeon_rate_aggregator::{
    Aggregator, AggregatorError, ArbitrageOpportunity, BestRateResult, Config,
    DEFAULT_ARBITRAGE_LIMIT,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::error;

/// Consulted when `--config` is not given.
const CONFIG_ENV: &str = "AEON_RATES_CONFIG";

/// aeon-rates - best rates and arbitrage across centralized exchanges.
#[derive(Parser, Debug)]
#[command(name = "aeon-rates")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cheapest ask and richest bid for one pair
    BestRate {
        /// Pair, e.g. BTC/USDT, btc-usdt or BTCUSDT
        pair: String,
    },

    /// Scan common pairs for cross-exchange spreads
    Arbitrage {
        /// Maximum number of opportunities (non-positive means 20)
        #[arg(long, default_value_t = DEFAULT_ARBITRAGE_LIMIT as i64, allow_negative_numbers = true)]
        limit: i64,

        /// Minimum profit in percent (negative means 0)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        min_profit: f64,
    },

    /// List pairs available on every contributing exchange
    Pairs,
}

#[derive(Tabled)]
struct SideRow {
    #[tabled(rename = "SIDE")]
    side: &'static str,
    #[tabled(rename = "EXCHANGE")]
    exchange: String,
    #[tabled(rename = "PRICE")]
    price: f64,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "EXCHANGE")]
    exchange: String,
    #[tabled(rename = "BID")]
    bid: f64,
    #[tabled(rename = "ASK")]
    ask: f64,
}

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "PAIR")]
    pair: String,
    #[tabled(rename = "BUY")]
    buy: String,
    #[tabled(rename = "BUY ASK")]
    buy_ask: f64,
    #[tabled(rename = "SELL")]
    sell: String,
    #[tabled(rename = "SELL BID")]
    sell_bid: f64,
    #[tabled(rename = "PROFIT %")]
    profit: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(e.exit_code());
        }
    };
    config.logging.init();

    if let Err(e) = run(cli, &config).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// `--config` wins over the environment; no path and no file means defaults.
fn load_config(flag: Option<PathBuf>) -> Result<Config, AggregatorError> {
    let explicit = flag.is_some();
    let path = flag.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) if explicit || path.exists() => Config::load(path),
        _ => Ok(Config::default()),
    }
}

async fn run(cli: Cli, config: &Config) -> Result<(), AggregatorError> {
    let aggregator = Aggregator::from_config(config)?;

    match cli.command {
        Commands::BestRate { pair } => {
            let pair = pair.trim();
            if !(3..=20).contains(&pair.chars().count()) {
                return Err(AggregatorError::InvalidValue(
                    "pair must be between 3 and 20 characters".to_string(),
                ));
            }

            let result = aggregator.best_rate(pair).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                print_best_rate(&result);
            }
        }
        Commands::Arbitrage { limit, min_profit } => {
            let limit = usize::try_from(limit)
                .ok()
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_ARBITRAGE_LIMIT);
            let min_profit = min_profit.max(0.0);

            let opportunities = aggregator.arbitrage(limit, min_profit).await;
            if cli.json {
                print_json(&opportunities)?;
            } else {
                print_opportunities(&opportunities);
            }
        }
        Commands::Pairs => {
            let pairs = aggregator.common_pairs().await;
            if cli.json {
                print_json(&pairs)?;
            } else if pairs.is_empty() {
                println!("No common pairs found");
            } else {
                for pair in &pairs {
                    println!("{}", pair);
                }
                println!();
                println!("{} pairs", pairs.len());
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AggregatorError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_best_rate(result: &BestRateResult) {
    println!("Pair: {}", result.pair());
    println!();

    let sides = vec![
        SideRow {
            side: "BUY (MIN ASK)",
            exchange: result.buy().exchange().to_string(),
            price: result.buy().price(),
        },
        SideRow {
            side: "SELL (MAX BID)",
            exchange: result.sell().exchange().to_string(),
            price: result.sell().price(),
        },
    ];
    println!("{}", Table::new(sides));
    println!();

    let quotes: Vec<QuoteRow> = result
        .quotes()
        .iter()
        .map(|q| QuoteRow {
            exchange: q.exchange().to_string(),
            bid: q.bid(),
            ask: q.ask(),
        })
        .collect();
    println!("{}", Table::new(quotes));
}

fn print_opportunities(opportunities: &[ArbitrageOpportunity]) {
    if opportunities.is_empty() {
        println!("No arbitrage opportunities found");
        return;
    }

    let rows: Vec<OpportunityRow> = opportunities
        .iter()
        .map(|o| OpportunityRow {
            pair: o.pair().to_string(),
            buy: o.buy_exchange().to_string(),
            buy_ask: o.buy_price(),
            sell: o.sell_exchange().to_string(),
            sell_bid: o.sell_price(),
            profit: format!("{:.4}", o.profit_percent()),
        })
        .collect();
    println!("{}", Table::new(rows));
}
