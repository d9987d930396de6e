//! Price-target prediction: three nested horizon bands around the
//! current price, shifted by sentiment and recent trend.

use crate::domain::analysis::{Prediction, PredictionSet, PriceRange};
use tracing::debug;

const MAX_VOLATILITY_FACTOR: f64 = 0.05;
const MAX_SENTIMENT_FACTOR: f64 = 0.02;
const MAX_TREND_FACTOR: f64 = 0.03;

/// Predict short/mid/long-term price ranges.
///
/// Bands widen and confidence decays monotonically with the horizon.
/// Both bounds are hard-clamped to [0.85, 1.15] of the current price.
pub fn predict(
    prices: &[f64],
    current_price: f64,
    volatility: f64,
    sentiment_score: f64,
) -> PredictionSet {
    if current_price <= 0.0 || !current_price.is_finite() {
        return PredictionSet::fallback(current_price.max(0.0));
    }

    let volatility_factor = (volatility / 1000.0).min(MAX_VOLATILITY_FACTOR);
    let sentiment_factor = (sentiment_score - 50.0) / 100.0 * MAX_SENTIMENT_FACTOR;
    let trend_factor = recent_trend_factor(prices);

    debug!(
        volatility_factor,
        sentiment_factor, trend_factor, "derived prediction factors"
    );

    let base_confidence =
        (70.0 - volatility_factor * 100.0 + sentiment_factor.abs() * 100.0).clamp(50.0, 90.0);

    let horizon = |multiplier: f64, floor: f64, confidence_scale: f64| {
        let half_width = volatility_factor * multiplier + 0.01 * multiplier;
        let raw_low = current_price * (1.0 - half_width);
        let raw_high = current_price * (1.0 + half_width);
        let shift = current_price * (sentiment_factor + trend_factor);

        Prediction {
            price: PriceRange {
                low: (raw_low + shift).max(current_price * 0.85),
                high: (raw_high + shift).min(current_price * 1.15),
            },
            confidence: (base_confidence * confidence_scale).max(floor),
            signals: band_signals(raw_low, raw_high, volatility_factor * multiplier),
        }
    };

    PredictionSet {
        short_term: horizon(1.0, 50.0, 1.0),
        mid_term: horizon(2.0, 40.0, 0.9),
        long_term: horizon(3.0, 30.0, 0.8),
    }
}

fn recent_trend_factor(prices: &[f64]) -> f64 {
    let recent = &prices[prices.len().saturating_sub(20)..];
    match (recent.first(), recent.last()) {
        (Some(&first), Some(&last)) if first > 0.0 => {
            ((last - first) / first).clamp(-MAX_TREND_FACTOR, MAX_TREND_FACTOR)
        }
        _ => 0.0,
    }
}

fn band_signals(low: f64, high: f64, volatility_factor: f64) -> Vec<String> {
    let mut signals = Vec::new();
    let range = (high - low) / low;

    if range > 0.10 {
        signals.push("Significant price movement expected".to_string());
    } else if range > 0.05 {
        signals.push("Moderate price movement expected".to_string());
    } else {
        signals.push("Stable price action expected".to_string());
    }

    if volatility_factor > 0.03 {
        signals.push("Higher than average volatility".to_string());
    } else if volatility_factor < 0.01 {
        signals.push("Lower than average volatility".to_string());
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_bands_widen_with_horizon() {
        let prices = rising(100);
        let set = predict(&prices, 199.0, 40.0, 55.0);

        let width = |p: &Prediction| p.price.high - p.price.low;
        assert!(width(&set.short_term) <= width(&set.mid_term));
        assert!(width(&set.mid_term) <= width(&set.long_term));
    }

    #[test]
    fn test_confidence_decays_with_horizon() {
        let set = predict(&rising(100), 199.0, 40.0, 55.0);
        assert!(set.short_term.confidence >= set.mid_term.confidence);
        assert!(set.mid_term.confidence >= set.long_term.confidence);
        assert!(set.long_term.confidence >= 30.0);
        assert!(set.short_term.confidence <= 90.0);
    }

    #[test]
    fn test_bounds_stay_within_hard_clamp() {
        let price = 200.0;
        let set = predict(&rising(100), price, 100.0, 95.0);

        for prediction in [&set.short_term, &set.mid_term, &set.long_term] {
            assert!(prediction.price.low >= price * 0.85 - 1e-9);
            assert!(prediction.price.high <= price * 1.15 + 1e-9);
            assert!(prediction.price.low <= prediction.price.high);
        }
    }

    #[test]
    fn test_positive_sentiment_shifts_bands_up() {
        let prices = vec![100.0; 100];
        let bullish = predict(&prices, 100.0, 30.0, 90.0);
        let bearish = predict(&prices, 100.0, 30.0, 10.0);

        assert!(bullish.short_term.price.low > bearish.short_term.price.low);
        assert!(bullish.short_term.price.high > bearish.short_term.price.high);
    }

    #[test]
    fn test_invalid_price_falls_back() {
        let set = predict(&[], 0.0, 30.0, 50.0);
        assert_eq!(set.short_term.signals, vec!["Default prediction".to_string()]);
    }

    #[test]
    fn test_calm_band_reads_stable() {
        let set = predict(&vec![100.0; 100], 100.0, 5.0, 50.0);
        assert!(set
            .short_term
            .signals
            .iter()
            .any(|s| s.contains("Stable price action")));
        assert!(set
            .short_term
            .signals
            .iter()
            .any(|s| s.contains("Lower than average volatility")));
    }
}
