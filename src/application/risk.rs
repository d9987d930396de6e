//! Risk scoring across technical, fundamental, sentiment and market
//! factors. Every factor lands in [0, 100], higher means riskier.

use crate::domain::analysis::{RiskFactors, RiskProfile};
use tracing::debug;

/// Assess risk from the latest series plus already-computed volatility,
/// trend strength and sentiment. Falls back to the flat 50-profile when
/// the series is too short to read.
pub fn assess(
    prices: &[f64],
    volumes: &[f64],
    volatility: f64,
    trend_strength: f64,
    sentiment_score: f64,
) -> RiskProfile {
    if prices.len() < 2 || volumes.len() < 2 {
        return RiskProfile::fallback();
    }

    let technical = technical_risk(volatility, trend_strength);
    let fundamental = fundamental_risk(prices, volumes, volatility);
    let sentiment = (100.0 - sentiment_score).clamp(0.0, 100.0);
    let market = market_risk(prices, volumes);

    let overall = (technical + fundamental + sentiment + market) / 4.0;
    let warnings = warnings(volumes, volatility, trend_strength);

    debug!(technical, fundamental, sentiment, market, overall, "assessed risk");

    RiskProfile {
        overall,
        factors: RiskFactors {
            technical,
            fundamental,
            sentiment,
            market,
        },
        warnings,
    }
}

fn technical_risk(volatility: f64, trend_strength: f64) -> f64 {
    (volatility * 0.7 + (1.0 - trend_strength.abs()) * 30.0).clamp(0.0, 100.0)
}

fn fundamental_risk(prices: &[f64], volumes: &[f64], volatility: f64) -> f64 {
    let n = prices.len();
    let price_change = ((prices[n - 1] - prices[n - 2]) / prices[n - 2]).abs();

    let m = volumes.len();
    let volume_change = if volumes[m - 2] > 0.0 {
        (volumes[m - 1] / volumes[m - 2] - 1.0).abs()
    } else {
        0.0
    };

    (volatility * 0.4 + volume_change * 30.0 + price_change * 30.0).clamp(0.0, 100.0)
}

fn market_risk(prices: &[f64], volumes: &[f64]) -> f64 {
    let window = &prices[prices.len().saturating_sub(20)..];
    let first = window[0];
    let momentum = if first != 0.0 {
        ((window[window.len() - 1] - first) / first * 100.0).abs()
    } else {
        0.0
    };

    let recent_volumes = &volumes[volumes.len().saturating_sub(20)..];
    let mean_volume = recent_volumes.iter().sum::<f64>() / recent_volumes.len() as f64;
    let volume_deviation = if mean_volume > 0.0 {
        (volumes[volumes.len() - 1] / mean_volume - 1.0).abs()
    } else {
        0.0
    };

    ((50.0 - momentum) * 0.6 + volume_deviation * 40.0).clamp(0.0, 100.0)
}

fn warnings(volumes: &[f64], volatility: f64, trend_strength: f64) -> Vec<String> {
    let mut warnings = Vec::new();

    if volatility > 50.0 {
        warnings.push("High market volatility".to_string());
    }
    if trend_strength.abs() < 0.3 {
        warnings.push("Weak market trend".to_string());
    }

    let m = volumes.len();
    if m >= 2 && volumes[m - 2] > 0.0 && volumes[m - 1] / volumes[m - 2] > 2.0 {
        warnings.push("Unusual trading volume".to_string());
    }

    if warnings.is_empty() {
        warnings.push("No significant risks detected".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_falls_back() {
        let profile = assess(&[100.0], &[1_000.0], 30.0, 0.5, 50.0);
        assert_eq!(profile.overall, 50.0);
        assert_eq!(profile.factors.technical, 50.0);
    }

    #[test]
    fn test_factors_stay_in_bounds() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 3.0).collect();
        let volumes = vec![1_000.0; 50];

        let profile = assess(&prices, &volumes, 95.0, 0.1, 5.0);
        for factor in [
            profile.factors.technical,
            profile.factors.fundamental,
            profile.factors.sentiment,
            profile.factors.market,
            profile.overall,
        ] {
            assert!((0.0..=100.0).contains(&factor), "factor {factor} out of range");
        }
    }

    #[test]
    fn test_high_volatility_raises_technical_risk_and_warns() {
        let prices = vec![100.0, 101.0, 99.0, 102.0];
        let volumes = vec![1_000.0; 4];

        let calm = assess(&prices, &volumes, 20.0, 0.8, 50.0);
        let stormy = assess(&prices, &volumes, 90.0, 0.8, 50.0);

        assert!(stormy.factors.technical > calm.factors.technical);
        assert!(stormy
            .warnings
            .iter()
            .any(|w| w == "High market volatility"));
    }

    #[test]
    fn test_price_jump_alone_keeps_sentinel() {
        // A big single-day move feeds the factor scores, not the
        // warning list.
        let mut prices = vec![100.0; 30];
        *prices.last_mut().unwrap() = 115.0;
        let volumes = vec![1_000.0; 30];

        let profile = assess(&prices, &volumes, 20.0, 0.8, 60.0);
        assert_eq!(profile.warnings, vec!["No significant risks detected".to_string()]);
    }

    #[test]
    fn test_weak_trend_warns() {
        let prices = vec![100.0, 100.5, 100.2, 100.4];
        let volumes = vec![1_000.0; 4];

        let profile = assess(&prices, &volumes, 20.0, 0.1, 50.0);
        assert!(profile.warnings.iter().any(|w| w.contains("Weak market trend")));
    }

    #[test]
    fn test_volume_spike_warns() {
        let prices = vec![100.0; 30];
        let mut volumes = vec![1_000.0; 30];
        *volumes.last_mut().unwrap() = 5_000.0;

        let profile = assess(&prices, &volumes, 20.0, 0.9, 50.0);
        assert!(profile.warnings.iter().any(|w| w.contains("Unusual trading volume")));
    }

    #[test]
    fn test_quiet_market_reports_no_risks() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.1).collect();
        let volumes = vec![1_000.0; 30];

        let profile = assess(&prices, &volumes, 20.0, 0.8, 60.0);
        assert_eq!(profile.warnings, vec!["No significant risks detected".to_string()]);
    }

    #[test]
    fn test_bearish_sentiment_raises_sentiment_risk() {
        let prices = vec![100.0, 101.0, 100.5, 101.5];
        let volumes = vec![1_000.0; 4];

        let gloomy = assess(&prices, &volumes, 20.0, 0.8, 20.0);
        let sunny = assess(&prices, &volumes, 20.0, 0.8, 80.0);
        assert!(gloomy.factors.sentiment > sunny.factors.sentiment);
    }
}
