use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily close prices and volumes for one coin, oldest first.
///
/// `prices` and `volumes` always share length. Most indicators need at
/// least 20 points; trend classification prefers 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalData {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
    pub current_price: f64,
    pub market_cap: f64,
    pub price_change_24h: f64,
}

impl HistoricalData {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Spot quote for one coin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinPrice {
    pub price: f64,
    pub change_24h: f64,
    pub market_cap: f64,
    pub timestamp: DateTime<Utc>,
}

/// Discrete sentiment label attached to a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsSentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for NewsSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsSentiment::Positive => write!(f, "positive"),
            NewsSentiment::Negative => write!(f, "negative"),
            NewsSentiment::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub sentiment: NewsSentiment,
    pub tags: Vec<String>,
}

/// Coin entry in the user-managed featured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub is_active: bool,
}

/// Search result from the market-data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Coarse market mood derived from price and volume action, used as the
/// "social volume" input to the sentiment aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPulse {
    pub sentiment: PulseSignal,
    /// 0-100 proxy for activity, from the volume change across the window.
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketPulse {
    pub fn neutral() -> Self {
        Self {
            sentiment: PulseSignal::Neutral,
            volume: 50.0,
            timestamp: Utc::now(),
        }
    }
}
