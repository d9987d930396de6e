//! End-to-end pipeline tests over deterministic mock providers.

use chrono::Utc;
use coinsight::application::analyzer::Analyzer;
use coinsight::domain::analysis::{
    MarketPhase, Recommendation, RiskLevel, SentimentSignal, DATA_UNAVAILABLE_WARNING,
};
use coinsight::domain::types::{NewsItem, NewsSentiment};
use coinsight::infrastructure::mock::{MockMarketDataProvider, MockNewsProvider};
use std::sync::Arc;

fn analyzer(market: MockMarketDataProvider, news: MockNewsProvider) -> Analyzer {
    Analyzer::new(Arc::new(market), Arc::new(news))
}

fn rising_series() -> (Vec<f64>, Vec<f64>) {
    let prices: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
    let volumes = vec![1_000.0; 200];
    (prices, volumes)
}

/// Flat for 150 days, then a choppy ~30% crash over the last 50.
fn crash_series() -> (Vec<f64>, Vec<f64>) {
    let mut prices = vec![100.0; 150];
    let mut price = 100.0;
    for i in 0..50 {
        price *= if i % 2 == 0 { 0.95 } else { 1.035 };
        prices.push(price);
    }
    let volumes = vec![1_000.0; 200];
    (prices, volumes)
}

fn article(title: &str, sentiment: NewsSentiment) -> NewsItem {
    NewsItem {
        id: title.to_string(),
        title: title.to_string(),
        description: "Body text long enough to pass the provider filters.".to_string(),
        source: "test".to_string(),
        url: None,
        image_url: None,
        timestamp: Utc::now(),
        sentiment,
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn test_uptrend_end_to_end() {
    let (prices, volumes) = rising_series();
    let analyzer = analyzer(
        MockMarketDataProvider::with_series(prices, volumes),
        MockNewsProvider::empty(),
    );

    let analysis = analyzer.full_analysis("bitcoin").await;

    assert_eq!(analysis.market_condition.phase, MarketPhase::Bullish);
    assert!(analysis.technical_signals.momentum.rsi.value > 50.0);
    assert!(matches!(
        analysis.trading_strategy.recommendation,
        Recommendation::Buy | Recommendation::StrongBuy
    ));

    let levels = &analysis.market_condition.key_levels;
    assert!(levels.strong_support < levels.support);
    assert!(levels.support < levels.resistance);
    assert!(levels.resistance < levels.strong_resistance);
}

#[tokio::test]
async fn test_crash_end_to_end() {
    let (prices, volumes) = crash_series();
    let analyzer = analyzer(
        MockMarketDataProvider::with_series(prices, volumes),
        MockNewsProvider::empty(),
    );

    let analysis = analyzer.full_analysis("bitcoin").await;

    assert_eq!(analysis.market_condition.phase, MarketPhase::Bearish);
    assert!(matches!(
        analysis.technical_signals.volatility.risk,
        RiskLevel::Medium | RiskLevel::High
    ));
    assert!(analysis.risk_analysis.factors.technical > 50.0);
    assert!(analysis
        .risk_analysis
        .warnings
        .iter()
        .any(|w| w.contains("volatility")));
    assert!(analysis.sentiment_analysis.overall.score < 50.0);
    assert!(!matches!(
        analysis.trading_strategy.recommendation,
        Recommendation::Buy | Recommendation::StrongBuy
    ));
    assert!((0.0..=100.0).contains(&analysis.risk_analysis.overall));
}

#[tokio::test]
async fn test_prediction_bands_nest_and_stay_clamped() {
    let (prices, volumes) = rising_series();
    let current_price = *prices.last().unwrap();
    let analyzer = analyzer(
        MockMarketDataProvider::with_series(prices, volumes),
        MockNewsProvider::empty(),
    );

    let predictions = analyzer.full_analysis("bitcoin").await.predictions;
    let width = |p: &coinsight::domain::analysis::Prediction| p.price.high - p.price.low;

    assert!(width(&predictions.short_term) <= width(&predictions.mid_term));
    assert!(width(&predictions.mid_term) <= width(&predictions.long_term));
    assert!(predictions.short_term.confidence >= predictions.mid_term.confidence);
    assert!(predictions.mid_term.confidence >= predictions.long_term.confidence);

    for prediction in [
        &predictions.short_term,
        &predictions.mid_term,
        &predictions.long_term,
    ] {
        assert!(prediction.price.low >= current_price * 0.85 - 1e-9);
        assert!(prediction.price.high <= current_price * 1.15 + 1e-9);
        assert!((30.0..=95.0).contains(&prediction.confidence));
    }
}

#[tokio::test]
async fn test_failed_fetch_degrades_to_defaults() {
    let analyzer = analyzer(MockMarketDataProvider::failing(), MockNewsProvider::empty());

    let analysis = analyzer.full_analysis("bitcoin").await;

    assert_eq!(analysis.market_condition.phase, MarketPhase::Analyzing);
    assert!(analysis
        .risk_analysis
        .warnings
        .iter()
        .any(|w| w == DATA_UNAVAILABLE_WARNING));
    // Fallback key levels still render a usable band.
    let levels = &analysis.market_condition.key_levels;
    assert!(levels.support < levels.resistance);
}

#[tokio::test]
async fn test_news_tone_moves_sentiment() {
    let (prices, volumes) = crash_series();

    let gloomy = analyzer(
        MockMarketDataProvider::with_series(prices.clone(), volumes.clone()),
        MockNewsProvider::with_items(vec![
            article("Exchange collapse deepens", NewsSentiment::Negative),
            article("Sell-off accelerates", NewsSentiment::Negative),
            article("Regulators circle", NewsSentiment::Negative),
        ]),
    );
    let sunny = analyzer(
        MockMarketDataProvider::with_series(prices, volumes),
        MockNewsProvider::with_items(vec![
            article("Adoption hits new milestone", NewsSentiment::Positive),
            article("Institutions keep buying", NewsSentiment::Positive),
            article("Upgrade ships on schedule", NewsSentiment::Positive),
        ]),
    );

    let gloomy_analysis = gloomy.full_analysis("bitcoin").await;
    let sunny_analysis = sunny.full_analysis("bitcoin").await;

    assert!(
        sunny_analysis.sentiment_analysis.overall.score
            > gloomy_analysis.sentiment_analysis.overall.score
    );
    assert_eq!(
        gloomy_analysis.sentiment_analysis.components.news.trend,
        SentimentSignal::Bearish
    );
    assert_eq!(
        sunny_analysis.sentiment_analysis.components.news.trend,
        SentimentSignal::Bullish
    );
}

#[tokio::test]
async fn test_empty_news_scores_neutral() {
    let (prices, volumes) = rising_series();
    let analyzer = analyzer(
        MockMarketDataProvider::with_series(prices, volumes),
        MockNewsProvider::empty(),
    );

    let analysis = analyzer.full_analysis("bitcoin").await;
    let news = &analysis.sentiment_analysis.components.news;
    assert_eq!(news.score, 50.0);
    assert_eq!(news.trend, SentimentSignal::Neutral);
    assert!(news.recent.is_empty());
}
