//! Sentiment aggregation: news, social and market scorers feeding a
//! weighted overall figure.

use crate::domain::analysis::{
    MarketComponent, MarketFlow, NewsComponent, OverallSentiment, SentimentComponents,
    SentimentSignal, SentimentSnapshot, SocialComponent, TechnicalSignals,
};
use crate::domain::types::{NewsItem, NewsSentiment};
use statrs::statistics::{Data, Distribution};
use tracing::debug;

const NEWS_WEIGHT: f64 = 0.3;
const SOCIAL_WEIGHT: f64 = 0.3;
const MARKET_WEIGHT: f64 = 0.4;

/// Build the full sentiment snapshot for one analysis cycle.
pub fn aggregate(
    news: &[NewsItem],
    social_volume: f64,
    technical: &TechnicalSignals,
) -> SentimentSnapshot {
    let news_score = news_score(news);
    let social = social_score(technical, social_volume, news_score);
    let market = market_score(technical);

    let overall = overall_sentiment(news_score, social.score, market.score);
    debug!(
        news = news_score,
        social = social.score,
        market = market.score,
        overall = overall.score,
        "aggregated sentiment"
    );

    SentimentSnapshot {
        overall,
        components: SentimentComponents {
            news: NewsComponent {
                score: news_score,
                recent: news.iter().take(3).map(|n| n.title.clone()).collect(),
                trend: news_trend(news),
            },
            social,
            market,
        },
    }
}

/// Mean of per-article label scores: positive 75, negative 25, neutral
/// 50. Empty input is neutral. The recency weight is a fixed 1.0 hook
/// until timestamps feed into it.
pub fn news_score(news: &[NewsItem]) -> f64 {
    if news.is_empty() {
        return 50.0;
    }

    let recency_weight = 1.0;
    let total: f64 = news
        .iter()
        .map(|item| {
            let base = match item.sentiment {
                NewsSentiment::Positive => 75.0,
                NewsSentiment::Negative => 25.0,
                NewsSentiment::Neutral => 50.0,
            };
            base * recency_weight
        })
        .sum();

    total / news.len() as f64
}

/// Label counts over the five most recent articles.
pub fn news_trend(news: &[NewsItem]) -> SentimentSignal {
    if news.is_empty() {
        return SentimentSignal::Neutral;
    }

    let recent = &news[..news.len().min(5)];
    let positive = recent
        .iter()
        .filter(|n| n.sentiment == NewsSentiment::Positive)
        .count() as f64;
    let negative = recent
        .iter()
        .filter(|n| n.sentiment == NewsSentiment::Negative)
        .count() as f64;

    if positive > negative * 1.5 {
        SentimentSignal::Bullish
    } else if negative > positive * 1.5 {
        SentimentSignal::Bearish
    } else {
        SentimentSignal::Neutral
    }
}

fn social_score(technical: &TechnicalSignals, social_volume: f64, news_score: f64) -> SocialComponent {
    let volume_change = technical.volume.change;
    let rsi = technical.momentum.rsi.value;

    let volume_score = if volume_change > 1.5 {
        70.0
    } else if volume_change > 1.0 {
        60.0
    } else if volume_change < 0.5 {
        30.0
    } else {
        40.0
    };

    let momentum_score = rsi_bucket(rsi);

    let social_volume_score = if social_volume > 70.0 {
        75.0
    } else if social_volume > 50.0 {
        65.0
    } else if social_volume < 30.0 {
        25.0
    } else {
        50.0
    };

    let score = volume_score * 0.25
        + momentum_score * 0.35
        + news_score * 0.25
        + social_volume_score * 0.15;

    SocialComponent {
        score,
        trend: signal_for(score),
        volume: volume_change,
    }
}

fn market_score(technical: &TechnicalSignals) -> MarketComponent {
    let rsi_score = rsi_bucket(technical.momentum.rsi.value);

    let macd_signal = technical.momentum.macd.signal.as_str();
    let macd_score = if macd_signal.contains("bullish") {
        65.0
    } else if macd_signal.contains("bearish") {
        35.0
    } else {
        50.0
    };

    let trend_score = match signal_for_trend(technical) {
        SentimentSignal::Bullish => 70.0,
        SentimentSignal::Bearish => 30.0,
        SentimentSignal::Neutral => 50.0,
    };

    let score = rsi_score * 0.3 + macd_score * 0.3 + trend_score * 0.4;

    MarketComponent {
        score,
        dominance: technical.trend.strength * 100.0,
        flow: if score > 60.0 {
            MarketFlow::Inflow
        } else if score < 40.0 {
            MarketFlow::Outflow
        } else {
            MarketFlow::Stable
        },
    }
}

fn signal_for_trend(technical: &TechnicalSignals) -> SentimentSignal {
    let primary = technical.trend.primary.to_string().to_lowercase();
    if primary.contains("bullish") {
        SentimentSignal::Bullish
    } else if primary.contains("bearish") {
        SentimentSignal::Bearish
    } else {
        SentimentSignal::Neutral
    }
}

fn rsi_bucket(rsi: f64) -> f64 {
    if rsi > 70.0 {
        75.0
    } else if rsi > 60.0 {
        65.0
    } else if rsi < 30.0 {
        25.0
    } else if rsi < 40.0 {
        35.0
    } else {
        50.0
    }
}

fn signal_for(score: f64) -> SentimentSignal {
    if score > 60.0 {
        SentimentSignal::Bullish
    } else if score < 40.0 {
        SentimentSignal::Bearish
    } else {
        SentimentSignal::Neutral
    }
}

fn overall_sentiment(news: f64, social: f64, market: f64) -> OverallSentiment {
    let score = news * NEWS_WEIGHT + social * SOCIAL_WEIGHT + market * MARKET_WEIGHT;

    // Component agreement drives confidence: aligned scorers are more
    // trustworthy than a split verdict.
    let components = vec![news, social, market];
    let n = components.len() as f64;
    let deviation = Data::new(components.clone())
        .variance()
        .map(|sample| (sample * (n - 1.0) / n).sqrt())
        .unwrap_or(0.0);

    let base_confidence = 100.0 - deviation * 2.0;
    let data_quality = components.iter().filter(|&&s| s != 0.0).count() as f64 / n;
    let confidence = (base_confidence * data_quality).clamp(30.0, 95.0);

    OverallSentiment {
        score,
        signal: signal_for(score),
        confidence,
    }
}
