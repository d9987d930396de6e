//! Builds the [`TechnicalSignals`] snapshot from raw price/volume series.

use crate::application::indicators;
use crate::domain::analysis::{
    IndicatorReading, MomentumSignals, RiskLevel, Significance, TechnicalSignals, TrendDirection,
    TrendSignal, VolatilitySignal, VolatilityTrend, VolumeSignal, VolumeTrendDirection,
};
use tracing::debug;

fn tail(series: &[f64], n: usize) -> &[f64] {
    &series[series.len().saturating_sub(n)..]
}

/// One technical snapshot per analysis cycle. Uses the trailing 100
/// points for volatility/volume and the trailing 200 for the volume
/// profile, mirroring the indicator windows of the dashboard.
pub fn technical_signals(prices: &[f64], volumes: &[f64]) -> TechnicalSignals {
    let ma20 = indicators::sma(prices, 20);
    let ma50 = indicators::sma(prices, 50);
    let ma200 = indicators::sma(prices, 200);

    let rsi = indicators::rsi(prices, 14);
    let macd = indicators::macd(prices);
    let stoch_rsi = indicators::stochastic_rsi(prices, 14);

    let volume_change = indicators::volume_ratio(tail(volumes, 100));
    let volatility = indicators::volatility(tail(prices, 100));

    let profile = indicators::volume_profile(tail(prices, 200), tail(volumes, 200));
    let trend_strength = if profile.strength > 0.0 {
        profile.strength
    } else {
        0.5
    };

    debug!(
        rsi,
        macd_value = macd.value,
        stoch_rsi,
        volatility,
        volume_change,
        trend_strength,
        "computed technical snapshot"
    );

    TechnicalSignals {
        trend: TrendSignal {
            primary: primary_trend(prices, ma20, ma50, ma200),
            secondary: secondary_trend(prices),
            strength: trend_strength,
        },
        momentum: MomentumSignals {
            rsi: IndicatorReading {
                value: rsi,
                signal: interpret_rsi(rsi).to_string(),
            },
            macd: IndicatorReading {
                value: macd.value,
                signal: interpret_macd(macd.value, macd.signal, macd.histogram),
            },
            stoch_rsi: IndicatorReading {
                value: stoch_rsi,
                signal: interpret_stoch_rsi(stoch_rsi).to_string(),
            },
        },
        volatility: VolatilitySignal {
            current: volatility,
            trend: volatility_trend(tail(prices, 100)),
            risk: volatility_risk(volatility),
        },
        volume: VolumeSignal {
            change: volume_change,
            trend: volume_trend(tail(volumes, 100)),
            significance: if profile.strength > 0.7 {
                Significance::Strong
            } else if profile.strength > 0.4 {
                Significance::Moderate
            } else {
                Significance::Weak
            },
        },
    }
}

fn primary_trend(prices: &[f64], ma20: f64, ma50: f64, ma200: f64) -> TrendDirection {
    let Some(&current) = prices.last() else {
        return TrendDirection::Neutral;
    };

    let above_ma20 = current > ma20;
    let above_ma50 = current > ma50;
    let above_ma200 = current > ma200;
    let short_term_slope = indicators::linear_regression_slope(tail(prices, 20));

    if above_ma20 && above_ma50 && above_ma200 && short_term_slope > 0.0 {
        TrendDirection::StrongBullish
    } else if above_ma20 && above_ma50 && short_term_slope > 0.0 {
        TrendDirection::Bullish
    } else if !above_ma20 && !above_ma50 && !above_ma200 && short_term_slope < 0.0 {
        TrendDirection::StrongBearish
    } else if !above_ma20 && !above_ma50 && short_term_slope < 0.0 {
        TrendDirection::Bearish
    } else {
        TrendDirection::Neutral
    }
}

fn secondary_trend(prices: &[f64]) -> TrendDirection {
    let recent = tail(prices, 20);
    let short = indicators::ema(recent, 5);
    let medium = indicators::ema(recent, 10);

    match (short.last(), medium.last()) {
        (Some(s), Some(m)) if s > m => TrendDirection::Bullish,
        (Some(s), Some(m)) if s < m => TrendDirection::Bearish,
        _ => TrendDirection::Neutral,
    }
}

fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "overbought"
    } else if rsi < 30.0 {
        "oversold"
    } else {
        "neutral"
    }
}

fn interpret_stoch_rsi(stoch_rsi: f64) -> &'static str {
    if stoch_rsi > 80.0 {
        "extremely overbought"
    } else if stoch_rsi > 60.0 {
        "overbought"
    } else if stoch_rsi < 20.0 {
        "extremely oversold"
    } else if stoch_rsi < 40.0 {
        "oversold"
    } else {
        "neutral"
    }
}

fn interpret_macd(value: f64, signal: f64, histogram: f64) -> String {
    let mut interpretation = if histogram > 0.0 {
        "Strong bullish momentum".to_string()
    } else if histogram < 0.0 {
        "Strong bearish momentum".to_string()
    } else {
        "neutral momentum".to_string()
    };

    if value > 0.0 && signal > 0.0 {
        interpretation.push_str(", upward trend");
    } else if value < 0.0 && signal < 0.0 {
        interpretation.push_str(", downward trend");
    }

    if (value - signal).abs() < 0.1 {
        interpretation.push_str(", potential trend reversal");
    }

    interpretation
}

fn volatility_trend(prices: &[f64]) -> VolatilityTrend {
    if prices.len() < 100 {
        return VolatilityTrend::Stable;
    }

    let current = indicators::volatility(tail(prices, 50));
    let previous = indicators::volatility(&prices[prices.len() - 100..prices.len() - 50]);

    if current > previous * 1.2 {
        VolatilityTrend::Increasing
    } else if current < previous * 0.8 {
        VolatilityTrend::Decreasing
    } else {
        VolatilityTrend::Stable
    }
}

fn volatility_risk(volatility: f64) -> RiskLevel {
    if volatility > 80.0 {
        RiskLevel::High
    } else if volatility > 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn volume_trend(volumes: &[f64]) -> VolumeTrendDirection {
    if volumes.len() < 100 {
        return VolumeTrendDirection::Neutral;
    }

    let recent: f64 = tail(volumes, 50).iter().sum::<f64>() / 50.0;
    let previous: f64 =
        volumes[volumes.len() - 100..volumes.len() - 50].iter().sum::<f64>() / 50.0;

    if recent > previous * 1.1 {
        VolumeTrendDirection::Increasing
    } else if recent < previous * 0.9 {
        VolumeTrendDirection::Decreasing
    } else {
        VolumeTrendDirection::Neutral
    }
}
