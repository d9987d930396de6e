use anyhow::Result;
use clap::{Parser, Subcommand};
use coinsight::application::analyzer::Analyzer;
use coinsight::application::featured_coins::FeaturedCoinService;
use coinsight::config::Config;
use coinsight::domain::ports::{MarketDataProvider, NewsProvider};
use coinsight::infrastructure::coingecko::CoinGeckoProvider;
use coinsight::infrastructure::mock::{MockMarketDataProvider, MockNewsProvider};
use coinsight::infrastructure::newsdata::NewsdataProvider;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coinsight", about = "Crypto market analysis pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full analysis pipeline for a coin
    Analyze {
        /// Coin id, e.g. "bitcoin"
        coin: String,
        /// Days of history to analyze
        #[arg(long)]
        days: Option<u32>,
    },
    /// Fetch the current price for a coin
    Price { coin: String },
    /// Fetch labeled news for a coin
    News {
        coin: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the featured-coin roster
    Coins,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let (market_data, news): (Arc<dyn MarketDataProvider>, Arc<dyn NewsProvider>) =
        if config.offline {
            info!("offline mode, using mock providers");
            (
                Arc::new(MockMarketDataProvider::flat(100.0)),
                Arc::new(MockNewsProvider::empty()),
            )
        } else {
            (
                Arc::new(CoinGeckoProvider::new(config.coingecko_base_url.clone())),
                Arc::new(NewsdataProvider::new(
                    config.newsdata_base_url.clone(),
                    config.newsdata_api_key.clone(),
                )),
            )
        };

    match cli.command {
        Command::Analyze { coin, days } => {
            let analyzer = Analyzer::new(market_data, news)
                .with_historical_days(days.unwrap_or(config.historical_days))
                .with_news_limit(config.news_limit);

            let analysis = analyzer.full_analysis(&coin).await;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::Price { coin } => {
            let price = market_data.price(&coin).await?;
            println!("{}", serde_json::to_string_pretty(&price)?);
        }
        Command::News { coin, limit } => {
            let items = news.news(&coin, limit.unwrap_or(config.news_limit)).await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Coins => {
            let service = FeaturedCoinService::new(market_data, config.max_active_coins);
            println!("{}", serde_json::to_string_pretty(&service.coins())?);
        }
    }

    Ok(())
}
