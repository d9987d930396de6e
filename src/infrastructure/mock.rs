//! Deterministic in-memory providers for tests and offline runs.

use crate::domain::errors::MarketDataError;
use crate::domain::ports::{MarketDataProvider, NewsProvider};
use crate::domain::types::{
    CoinListing, CoinPrice, HistoricalData, MarketPulse, NewsItem, PulseSignal,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;

pub struct MockMarketDataProvider {
    prices: Vec<f64>,
    volumes: Vec<f64>,
    fail: bool,
}

impl MockMarketDataProvider {
    /// Constant price series, useful when only the plumbing matters.
    pub fn flat(price: f64) -> Self {
        Self::with_series(vec![price; 200], vec![1_000.0; 200])
    }

    pub fn with_series(prices: Vec<f64>, volumes: Vec<f64>) -> Self {
        Self {
            prices,
            volumes,
            fail: false,
        }
    }

    /// Every call returns an error, for exercising fallback paths.
    pub fn failing() -> Self {
        Self {
            prices: Vec::new(),
            volumes: Vec::new(),
            fail: true,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.fail {
            return Err(MarketDataError::RequestFailed {
                symbol: "mock".to_string(),
                reason: "provider configured to fail".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn current_price(&self) -> f64 {
        self.prices.last().copied().unwrap_or(0.0)
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn price(&self, _coin: &str) -> Result<CoinPrice> {
        self.check_available()?;
        Ok(CoinPrice {
            price: self.current_price(),
            change_24h: 0.0,
            market_cap: 0.0,
            timestamp: Utc::now(),
        })
    }

    async fn historical(&self, _coin: &str, _days: u32) -> Result<HistoricalData> {
        self.check_available()?;
        Ok(HistoricalData {
            prices: self.prices.clone(),
            volumes: self.volumes.clone(),
            current_price: self.current_price(),
            market_cap: 0.0,
            price_change_24h: 0.0,
        })
    }

    async fn batch_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>> {
        self.check_available()?;
        let mut prices = HashMap::new();
        for coin in coins {
            prices.insert(coin.clone(), self.price(coin).await?);
        }
        Ok(prices)
    }

    async fn batch_historical(
        &self,
        coins: &[String],
        days: u32,
    ) -> Result<HashMap<String, HistoricalData>> {
        self.check_available()?;
        let mut data = HashMap::new();
        for coin in coins {
            data.insert(coin.clone(), self.historical(coin, days).await?);
        }
        Ok(data)
    }

    async fn search(&self, query: &str) -> Result<Vec<CoinListing>> {
        self.check_available()?;
        Ok(vec![CoinListing {
            id: query.to_lowercase(),
            symbol: query.to_uppercase(),
            name: query.to_string(),
        }])
    }

    async fn market_pulse(&self, _coin: &str) -> Result<MarketPulse> {
        self.check_available()?;
        Ok(MarketPulse {
            sentiment: PulseSignal::Neutral,
            volume: 50.0,
            timestamp: Utc::now(),
        })
    }
}

pub struct MockNewsProvider {
    items: Vec<NewsItem>,
    fail: bool,
}

impl MockNewsProvider {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            fail: false,
        }
    }

    pub fn with_items(items: Vec<NewsItem>) -> Self {
        Self { items, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    async fn news(&self, coin: &str, limit: usize) -> Result<Vec<NewsItem>> {
        if self.fail {
            return Err(MarketDataError::RequestFailed {
                symbol: coin.to_string(),
                reason: "mock news provider configured to fail".to_string(),
            }
            .into());
        }
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}
