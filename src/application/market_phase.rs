//! Market-phase classification from moving-average structure.

use crate::application::{confidence, indicators};
use crate::domain::analysis::{KeyLevels, MarketCondition, MarketPhase};
use crate::domain::errors::AnalysisError;
use tracing::debug;

/// Signed trend strength in [-1, 1], blended from ADX, trend intensity,
/// rate of change and volume trend. Replaces the dashboard's opaque
/// trend model with a deterministic weighted combination of the same
/// four inputs.
pub fn trend_strength(prices: &[f64], volumes: &[f64]) -> f64 {
    let adx = indicators::adx(prices, 14);
    let intensity = indicators::trend_intensity(prices);
    let roc = indicators::price_roc(prices, 14);
    let volume_delta = indicators::volume_trend_delta(volumes);

    let direction = if intensity != 0.0 {
        intensity.signum()
    } else {
        roc.signum()
    };

    let magnitude = 0.4 * (adx / 100.0)
        + 0.3 * intensity.abs()
        + 0.2 * (roc.abs() / 20.0).min(1.0)
        + 0.1 * volume_delta.abs().min(1.0);

    (direction * magnitude).clamp(-1.0, 1.0)
}

/// Classify the market phase and derive key price levels.
///
/// The caller maps `Err` to [`MarketCondition::fallback`]; this function
/// never invents levels for degenerate input.
pub fn classify(prices: &[f64], volumes: &[f64]) -> Result<MarketCondition, AnalysisError> {
    let Some(&current_price) = prices.last() else {
        return Err(AnalysisError::InvalidSeries {
            symbol: String::new(),
            reason: "empty price series".to_string(),
        });
    };

    let ma20 = indicators::sma(prices, 20);
    let ma50 = indicators::sma(prices, 50);
    let ma200 = indicators::sma(prices, 200);

    let above_ma50 = current_price > ma50;
    let above_ma200 = current_price > ma200;
    let ma50_above_ma200 = ma50 > ma200;
    let ma20_above_ma50 = ma20 > ma50;

    let phase = if above_ma50 && ma50_above_ma200 && ma20_above_ma50 {
        MarketPhase::Bullish
    } else if !above_ma50 && !ma50_above_ma200 && !ma20_above_ma50 {
        MarketPhase::Bearish
    } else if above_ma200 && !above_ma50 {
        MarketPhase::Correction
    } else if !above_ma200 && above_ma50 {
        MarketPhase::Recovery
    } else {
        MarketPhase::Sideways
    };

    let recent = &prices[prices.len().saturating_sub(20)..];
    let low_20 = recent.iter().cloned().fold(f64::INFINITY, f64::min);
    let high_20 = recent.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let support = low_20
        .max(ma20.min(ma50) * 0.995)
        .max(current_price * 0.95);
    // Resistance is forced at least 1% above support
    let resistance = high_20
        .min(ma20.max(ma50) * 1.005)
        .min(current_price * 1.05)
        .max(support * 1.01);

    if !support.is_finite() || !resistance.is_finite() || resistance <= 0.0 {
        return Err(AnalysisError::Computation {
            stage: "market_phase".to_string(),
            reason: "degenerate support/resistance levels".to_string(),
        });
    }

    let strength = trend_strength(prices, volumes).abs();
    let position = if resistance > support {
        ((current_price - support) / (resistance - support)).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let confidence = confidence::combine(&[
        strength * 100.0,
        if above_ma50 { 60.0 } else { 40.0 },
        if above_ma200 { 60.0 } else { 40.0 },
        position * 100.0,
    ]);

    debug!(%phase, ma20, ma50, ma200, support, resistance, "classified market phase");

    Ok(MarketCondition {
        phase,
        strength,
        confidence,
        key_levels: KeyLevels {
            strong_support: support * 0.99,
            support,
            pivot: current_price,
            resistance,
            strong_resistance: resistance * 1.01,
        },
    })
}
