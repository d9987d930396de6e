//! CoinGecko-shaped market data provider with TTL caching and stale
//! fallback for historical series.

use crate::domain::errors::MarketDataError;
use crate::domain::ports::MarketDataProvider;
use crate::domain::types::{CoinListing, CoinPrice, HistoricalData, MarketPulse, PulseSignal};
use crate::infrastructure::cache::{cache_key, CacheKind, TtlCache};
use crate::infrastructure::http_client_factory::{build_url_with_query, HttpClientFactory};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: f64,
    #[serde(default)]
    usd_24h_change: Option<f64>,
    #[serde(default)]
    usd_market_cap: Option<f64>,
}

/// `[timestamp_ms, value]` pairs as the chart endpoint returns them.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
    total_volumes: Vec<(f64, f64)>,
    #[serde(default)]
    market_caps: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    symbol: String,
    name: String,
}

pub struct CoinGeckoProvider {
    client: ClientWithMiddleware,
    base_url: String,
    price_cache: TtlCache<CoinPrice>,
    historical_cache: TtlCache<HistoricalData>,
    pulse_cache: TtlCache<MarketPulse>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url,
            price_cache: TtlCache::new(),
            historical_cache: TtlCache::new(),
            pulse_cache: TtlCache::new(),
        }
    }

    async fn fetch_simple_prices(
        &self,
        ids: &str,
    ) -> Result<HashMap<String, SimplePriceEntry>> {
        let url = build_url_with_query(
            &format!("{}/simple/price", self.base_url),
            &[
                ("ids", ids),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_market_cap", "true"),
            ],
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("price request failed for {ids}"))?;

        if response.status().as_u16() == 429 {
            return Err(MarketDataError::RateLimitExceeded {
                retry_after_secs: 60,
            }
            .into());
        }

        response
            .error_for_status()
            .context("price request rejected")?
            .json::<HashMap<String, SimplePriceEntry>>()
            .await
            .context("malformed price response")
    }

    async fn fetch_market_chart(&self, coin: &str, days: u32) -> Result<HistoricalData> {
        let url = build_url_with_query(
            &format!("{}/coins/{}/market_chart", self.base_url, coin),
            &[
                ("vs_currency", "usd"),
                ("days", days.to_string().as_str()),
                ("interval", "daily"),
            ],
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("market chart request failed for {coin}"))?
            .error_for_status()
            .context("market chart request rejected")?
            .json::<MarketChartResponse>()
            .await
            .context("malformed market chart response")?;

        let prices: Vec<f64> = response.prices.iter().map(|(_, value)| *value).collect();
        let volumes: Vec<f64> = response
            .total_volumes
            .iter()
            .map(|(_, value)| *value)
            .collect();

        if prices.is_empty() {
            return Err(MarketDataError::InvalidData {
                symbol: coin.to_string(),
                reason: "empty price series".to_string(),
            }
            .into());
        }

        let current_price = prices[prices.len() - 1];
        let price_change_24h = if prices.len() >= 2 && prices[prices.len() - 2] != 0.0 {
            (current_price - prices[prices.len() - 2]) / prices[prices.len() - 2] * 100.0
        } else {
            0.0
        };

        Ok(HistoricalData {
            prices,
            volumes,
            current_price,
            market_cap: response.market_caps.last().map(|(_, cap)| *cap).unwrap_or(0.0),
            price_change_24h,
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn price(&self, coin: &str) -> Result<CoinPrice> {
        let key = cache_key(CacheKind::Price, coin);
        if let Some(cached) = self.price_cache.get(CacheKind::Price, &key) {
            debug!(%coin, "price cache hit");
            return Ok(cached);
        }

        let mut entries = self.fetch_simple_prices(coin).await?;
        let entry = entries.remove(coin).ok_or_else(|| MarketDataError::InvalidData {
            symbol: coin.to_string(),
            reason: "no price entry in response".to_string(),
        })?;

        let price = CoinPrice {
            price: entry.usd,
            change_24h: entry.usd_24h_change.unwrap_or(0.0),
            market_cap: entry.usd_market_cap.unwrap_or(0.0),
            timestamp: Utc::now(),
        };
        self.price_cache.insert(key, price.clone());
        Ok(price)
    }

    async fn historical(&self, coin: &str, days: u32) -> Result<HistoricalData> {
        let key = cache_key(CacheKind::Historical, &format!("{coin}-{days}"));
        if let Some(cached) = self.historical_cache.get(CacheKind::Historical, &key) {
            debug!(%coin, days, "historical cache hit");
            return Ok(cached);
        }

        match self.fetch_market_chart(coin, days).await {
            Ok(data) => {
                self.historical_cache.insert(key, data.clone());
                Ok(data)
            }
            Err(error) => {
                // Stale data beats no data for chart rendering.
                if let Some(stale) = self.historical_cache.get_any(&key) {
                    warn!(%coin, %error, "using stale historical data after fetch failure");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    async fn batch_prices(&self, coins: &[String]) -> Result<HashMap<String, CoinPrice>> {
        if coins.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = coins.join(",");
        let entries = self.fetch_simple_prices(&ids).await?;

        let now = Utc::now();
        Ok(entries
            .into_iter()
            .map(|(id, entry)| {
                (
                    id,
                    CoinPrice {
                        price: entry.usd,
                        change_24h: entry.usd_24h_change.unwrap_or(0.0),
                        market_cap: entry.usd_market_cap.unwrap_or(0.0),
                        timestamp: now,
                    },
                )
            })
            .collect())
    }

    async fn batch_historical(
        &self,
        coins: &[String],
        days: u32,
    ) -> Result<HashMap<String, HistoricalData>> {
        let fetches = coins.iter().map(|coin| async move {
            (coin.clone(), self.historical(coin, days).await)
        });

        let mut results = HashMap::new();
        for (coin, result) in join_all(fetches).await {
            match result {
                Ok(data) => {
                    results.insert(coin, data);
                }
                Err(error) => warn!(%coin, %error, "skipping coin in batch historical fetch"),
            }
        }
        Ok(results)
    }

    async fn search(&self, query: &str) -> Result<Vec<CoinListing>> {
        let url = build_url_with_query(&format!("{}/search", self.base_url), &[("query", query)]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("search request failed for '{query}'"))?
            .error_for_status()
            .context("search request rejected")?
            .json::<SearchResponse>()
            .await
            .context("malformed search response")?;

        Ok(response
            .coins
            .into_iter()
            .map(|coin| CoinListing {
                id: coin.id,
                symbol: coin.symbol,
                name: coin.name,
            })
            .collect())
    }

    /// Cheap market mood figure from 24h change and the volume swing
    /// over the last week. Cached on the slow sentiment TTL and neutral
    /// when upstream data is missing.
    async fn market_pulse(&self, coin: &str) -> Result<MarketPulse> {
        let key = cache_key(CacheKind::Sentiment, coin);
        if let Some(cached) = self.pulse_cache.get(CacheKind::Sentiment, &key) {
            return Ok(cached);
        }

        let pulse = match (self.price(coin).await, self.historical(coin, 7).await) {
            (Ok(price), Ok(data)) => {
                let sentiment = if price.change_24h > 2.0 {
                    PulseSignal::Bullish
                } else if price.change_24h < -2.0 {
                    PulseSignal::Bearish
                } else {
                    PulseSignal::Neutral
                };

                let volume = match (data.volumes.first(), data.volumes.last()) {
                    (Some(&first), Some(&last)) if first > 0.0 => {
                        ((last - first) / first * 100.0).abs().clamp(0.0, 100.0)
                    }
                    _ => 50.0,
                };

                MarketPulse {
                    sentiment,
                    volume,
                    timestamp: Utc::now(),
                }
            }
            (price_result, historical_result) => {
                if let Err(error) = price_result {
                    warn!(%coin, %error, "pulse price fetch failed");
                }
                if let Err(error) = historical_result {
                    warn!(%coin, %error, "pulse historical fetch failed");
                }
                MarketPulse::neutral()
            }
        };

        self.pulse_cache.insert(key, pulse.clone());
        Ok(pulse)
    }
}
