//! Pipeline entry point: fetches market data and news, then runs every
//! analysis stage in order. The public surface never fails; degraded
//! input degrades to renderable defaults instead.

use crate::application::{market_phase, prediction, risk, sentiment, signals, strategy};
use crate::domain::analysis::{Analysis, MarketCondition};
use crate::domain::ports::{MarketDataProvider, NewsProvider};
use crate::domain::types::{HistoricalData, NewsItem};
use std::sync::Arc;
use tracing::{info, warn};

/// Minimum series length the pipeline will read signals from.
pub const MIN_DATA_POINTS: usize = 20;

/// Price used when neither historical nor spot data could be fetched.
const LAST_RESORT_PRICE: f64 = 76_000.0;

pub struct Analyzer {
    market_data: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    historical_days: u32,
    news_limit: usize,
}

impl Analyzer {
    pub fn new(market_data: Arc<dyn MarketDataProvider>, news: Arc<dyn NewsProvider>) -> Self {
        Self {
            market_data,
            news,
            historical_days: 200,
            news_limit: 10,
        }
    }

    pub fn with_historical_days(mut self, days: u32) -> Self {
        self.historical_days = days;
        self
    }

    pub fn with_news_limit(mut self, limit: usize) -> Self {
        self.news_limit = limit;
        self
    }

    /// Run the full pipeline for one coin. Always returns a renderable
    /// analysis; upstream failures surface as defaults, never errors.
    pub async fn full_analysis(&self, coin: &str) -> Analysis {
        let data = match self.market_data.historical(coin, self.historical_days).await {
            Ok(data) => data,
            Err(error) => {
                warn!(%coin, %error, "historical data unavailable, using defaults");
                return Analysis::fallback(coin, self.spot_price_or_default(coin).await);
            }
        };

        if data.prices.len() < MIN_DATA_POINTS {
            warn!(
                %coin,
                points = data.prices.len(),
                "not enough history for analysis, using defaults"
            );
            let price = if data.current_price > 0.0 {
                data.current_price
            } else {
                self.spot_price_or_default(coin).await
            };
            return Analysis::fallback(coin, price);
        }

        let news = self.fetch_news(coin).await;
        let analysis = self.analyze(coin, &data, &news).await;
        info!(
            %coin,
            phase = %analysis.market_condition.phase,
            recommendation = %analysis.trading_strategy.recommendation,
            "analysis complete"
        );
        analysis
    }

    async fn analyze(&self, coin: &str, data: &HistoricalData, news: &[NewsItem]) -> Analysis {
        let current_price = if data.current_price > 0.0 {
            data.current_price
        } else {
            data.prices.last().copied().unwrap_or(LAST_RESORT_PRICE)
        };

        let technical = signals::technical_signals(&data.prices, &data.volumes);

        let market_condition = match market_phase::classify(&data.prices, &data.volumes) {
            Ok(condition) => condition,
            Err(error) => {
                warn!(%coin, %error, "market phase classification failed");
                MarketCondition::fallback(coin, current_price)
            }
        };

        let social_volume = match self.market_data.market_pulse(coin).await {
            Ok(pulse) => pulse.volume,
            Err(error) => {
                warn!(%coin, %error, "market pulse unavailable");
                50.0
            }
        };

        let sentiment_analysis = sentiment::aggregate(news, social_volume, &technical);

        let trend_strength = market_phase::trend_strength(&data.prices, &data.volumes);
        let risk_analysis = risk::assess(
            &data.prices,
            &data.volumes,
            technical.volatility.current,
            trend_strength,
            sentiment_analysis.overall.score,
        );

        let predictions = prediction::predict(
            &data.prices,
            current_price,
            technical.volatility.current,
            sentiment_analysis.overall.score,
        );

        let trading_strategy = strategy::generate(
            current_price,
            &market_condition,
            &technical,
            &sentiment_analysis,
            &risk_analysis,
        );

        Analysis {
            market_condition,
            technical_signals: technical,
            sentiment_analysis,
            predictions,
            risk_analysis,
            trading_strategy,
        }
    }

    async fn fetch_news(&self, coin: &str) -> Vec<NewsItem> {
        match self.news.news(coin, self.news_limit).await {
            Ok(items) => items,
            Err(error) => {
                warn!(%coin, %error, "news unavailable, scoring without articles");
                Vec::new()
            }
        }
    }

    async fn spot_price_or_default(&self, coin: &str) -> f64 {
        match self.market_data.price(coin).await {
            Ok(price) => price.price,
            Err(error) => {
                warn!(%coin, %error, "spot price unavailable");
                LAST_RESORT_PRICE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{MarketPhase, DATA_UNAVAILABLE_WARNING};
    use crate::infrastructure::mock::{MockMarketDataProvider, MockNewsProvider};

    fn analyzer(market: MockMarketDataProvider, news: MockNewsProvider) -> Analyzer {
        Analyzer::new(Arc::new(market), Arc::new(news))
    }

    #[tokio::test]
    async fn test_uptrend_produces_bullish_analysis() {
        let prices: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
        let volumes = vec![1_000.0; 200];
        let analyzer = analyzer(
            MockMarketDataProvider::with_series(prices, volumes),
            MockNewsProvider::empty(),
        );

        let analysis = analyzer.full_analysis("bitcoin").await;
        assert_eq!(analysis.market_condition.phase, MarketPhase::Bullish);
        assert!(analysis.technical_signals.momentum.rsi.value > 50.0);
    }

    #[tokio::test]
    async fn test_failing_provider_yields_fallback() {
        let analyzer = analyzer(MockMarketDataProvider::failing(), MockNewsProvider::empty());

        let analysis = analyzer.full_analysis("bitcoin").await;
        assert_eq!(analysis.market_condition.phase, MarketPhase::Analyzing);
        assert!(analysis
            .risk_analysis
            .warnings
            .iter()
            .any(|w| w == DATA_UNAVAILABLE_WARNING));
    }

    #[tokio::test]
    async fn test_short_history_yields_fallback() {
        let analyzer = analyzer(
            MockMarketDataProvider::with_series(vec![100.0; 5], vec![1.0; 5]),
            MockNewsProvider::empty(),
        );

        let analysis = analyzer.full_analysis("ethereum").await;
        assert_eq!(analysis.market_condition.phase, MarketPhase::Analyzing);
    }

    #[tokio::test]
    async fn test_news_failure_scores_neutral_news() {
        let prices: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
        let analyzer = analyzer(
            MockMarketDataProvider::with_series(prices, vec![1_000.0; 200]),
            MockNewsProvider::failing(),
        );

        let analysis = analyzer.full_analysis("bitcoin").await;
        assert_eq!(analysis.sentiment_analysis.components.news.score, 50.0);
    }
}
