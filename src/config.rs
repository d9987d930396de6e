use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub coingecko_base_url: String,
    pub newsdata_base_url: String,
    pub newsdata_api_key: String,
    pub historical_days: u32,
    pub news_limit: usize,
    pub max_active_coins: usize,
    /// Offline mode swaps the HTTP providers for deterministic mocks.
    pub offline: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let coingecko_base_url = env::var("COINGECKO_BASE_URL")
            .unwrap_or_else(|_| crate::infrastructure::coingecko::DEFAULT_BASE_URL.to_string());
        let newsdata_base_url = env::var("NEWSDATA_BASE_URL")
            .unwrap_or_else(|_| crate::infrastructure::newsdata::DEFAULT_BASE_URL.to_string());
        let newsdata_api_key = env::var("NEWSDATA_API_KEY").unwrap_or_default();

        let historical_days = env::var("HISTORICAL_DAYS")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .unwrap_or(200);

        let news_limit = env::var("NEWS_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let max_active_coins = env::var("MAX_ACTIVE_COINS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let offline = env::var("OFFLINE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            coingecko_base_url,
            newsdata_base_url,
            newsdata_api_key,
            historical_days,
            news_limit,
            max_active_coins,
            offline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Relies on the test environment not defining these variables.
        let config = Config::from_env().unwrap();
        assert_eq!(config.historical_days, 200);
        assert_eq!(config.news_limit, 10);
        assert_eq!(config.max_active_coins, 10);
        assert!(config.coingecko_base_url.contains("coingecko"));
    }
}
