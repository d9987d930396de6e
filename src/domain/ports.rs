use crate::domain::types::{CoinListing, CoinPrice, HistoricalData, MarketPulse, NewsItem};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn price(&self, coin: &str) -> Result<CoinPrice>;

    async fn historical(&self, coin: &str, days: u32) -> Result<HistoricalData>;

    async fn batch_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>>;

    async fn batch_historical(
        &self,
        coins: &[String],
        days: u32,
    ) -> Result<HashMap<String, HistoricalData>>;

    async fn search(&self, query: &str) -> Result<Vec<CoinListing>>;

    /// Market mood derived from price/volume action. Implementations fall
    /// back to a neutral pulse rather than failing.
    async fn market_pulse(&self, coin: &str) -> Result<MarketPulse>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn news(&self, coin: &str, limit: usize) -> Result<Vec<NewsItem>>;
}
