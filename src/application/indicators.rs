//! Pure technical-indicator functions over daily close prices and volumes.
//!
//! Every function upholds the "always return a usable number" contract:
//! short, empty or NaN-producing inputs resolve to a documented neutral
//! default (50 for oscillators, 0 for directional estimators, 30 for
//! volatility, 1 for volume ratios) instead of an error. No function
//! holds state; identical inputs yield bit-identical outputs.

use std::collections::BTreeMap;

/// Simple moving average over the trailing `period` elements.
///
/// Inputs shorter than `period` are still divided by `period`, which
/// biases the early MA200 low on young series. Returns 0 on empty input.
pub fn sma(series: &[f64], period: usize) -> f64 {
    if series.is_empty() || period == 0 {
        return 0.0;
    }
    let start = series.len().saturating_sub(period);
    let sum: f64 = series[start..].iter().sum();
    sum / period as f64
}

/// Exponential moving average, one value per input index.
///
/// Smoothing constant k = 2/(period+1), seeded with the first element.
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(series.len());
    out.push(series[0]);
    for i in 1..series.len() {
        let prev = out[i - 1];
        out.push(series[i] * k + prev * (1.0 - k));
    }
    out
}

/// Relative Strength Index with Wilder's smoothing.
///
/// Returns 50 when fewer than `period + 1` points are available, when
/// all differences are zero, or when the computation degenerates.
pub fn rsi(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period + 1 {
        return 50.0;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let diff = series[i] - series[i - 1];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;

    for i in (period + 1)..series.len() {
        let diff = series[i] - series[i - 1];
        avg_gain = (avg_gain * (period as f64 - 1.0) + diff.max(0.0)) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + (-diff).max(0.0)) / period as f64;
    }

    if avg_loss == 0.0 {
        // Flat series has no directional information; pure gains saturate.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - (100.0 / (1.0 + rs));
    if value.is_nan() {
        50.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Iterative RSI values past the warm-up window, used by the stochastic
/// RSI normalization.
pub fn rsi_series(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() < period + 2 {
        return Vec::new();
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let diff = series[i] - series[i - 1];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    let mut out = Vec::with_capacity(series.len() - period - 1);

    for i in (period + 1)..series.len() {
        let diff = series[i] - series[i - 1];
        avg_gain = (avg_gain * (period as f64 - 1.0) + diff.max(0.0)) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + (-diff).max(0.0)) / period as f64;

        let value = if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        out.push(value.clamp(0.0, 100.0));
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD at the latest index: EMA(12) - EMA(26), signal = EMA(9) of the
/// full MACD line.
pub fn macd(series: &[f64]) -> MacdOutput {
    if series.is_empty() {
        return MacdOutput {
            value: 0.0,
            signal: 0.0,
            histogram: 0.0,
        };
    }

    let ema12 = ema(series, 12);
    let ema26 = ema(series, 26);
    let line: Vec<f64> = ema12
        .iter()
        .zip(ema26.iter())
        .map(|(fast, slow)| fast - slow)
        .collect();

    let value = *line.last().unwrap_or(&0.0);
    let signal = *ema(&line, 9).last().unwrap_or(&0.0);

    MacdOutput {
        value,
        signal,
        histogram: value - signal,
    }
}

/// Latest RSI normalized against the min/max of the trailing RSI array.
/// Returns 50 when the RSI band is flat or too short.
pub fn stochastic_rsi(series: &[f64], period: usize) -> f64 {
    let rsi_values = rsi_series(series, period);
    let Some(&current) = rsi_values.last() else {
        return 50.0;
    };

    let min = rsi_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = rsi_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return 50.0;
    }

    (((current - min) / (max - min)) * 100.0).clamp(0.0, 100.0)
}

/// Annualized volatility: std dev of log returns * sqrt(365) * 100,
/// clamped to [0, 100]. Returns 30 on insufficient or degenerate input.
pub fn volatility(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 30.0;
    }

    let returns: Vec<f64> = series
        .windows(2)
        .map(|pair| (pair[1] / pair[0]).ln())
        .collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let annualized = variance.sqrt() * 365.0_f64.sqrt() * 100.0;

    if annualized.is_nan() {
        30.0
    } else {
        annualized.clamp(0.0, 100.0)
    }
}

/// True range built from close-price proxies: each bar's "high" is the
/// current close and "low" is the previous close, because only close
/// prices exist in this data source.
pub fn true_range_series(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            (curr - prev)
                .max((curr - prev).abs())
                .max((prev - curr).abs())
        })
        .collect()
}

/// Simplified directional-movement index over close-price proxies.
///
/// Not the textbook ADX: with no OHLC candles available the high/low
/// inputs are approximated from consecutive closes. Kept deliberately;
/// do not "fix" to real OHLC semantics.
pub fn adx(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period + 1 {
        return 0.0;
    }

    let tr = true_range_series(series);
    let atr: f64 = tr.iter().rev().take(period).sum::<f64>() / period as f64;
    if atr == 0.0 {
        return 0.0;
    }

    let mut dm_plus = 0.0;
    let mut dm_minus = 0.0;
    for pair in series.windows(2) {
        dm_plus += (pair[1] - pair[0]).max(0.0);
        dm_minus += (pair[0] - pair[1]).max(0.0);
    }

    let di_plus = (dm_plus / period as f64) / atr * 100.0;
    let di_minus = (dm_minus / period as f64) / atr * 100.0;
    if di_plus + di_minus == 0.0 {
        return 0.0;
    }

    ((di_plus - di_minus).abs() / (di_plus + di_minus) * 100.0).clamp(0.0, 100.0)
}

/// Ratio of the 5-period average volume to the 20-period average.
/// Returns 1 when fewer than 20 points are available.
pub fn volume_ratio(volumes: &[f64]) -> f64 {
    if volumes.len() < 20 {
        return 1.0;
    }

    let recent: f64 = volumes.iter().rev().take(5).sum::<f64>() / 5.0;
    let average: f64 = volumes.iter().rev().take(20).sum::<f64>() / 20.0;
    if average == 0.0 {
        return 1.0;
    }

    let ratio = recent / average;
    if ratio.is_nan() { 1.0 } else { ratio.max(0.0) }
}

/// Relative difference between recent (5) and historical (20) average
/// volume. Returns 0 when fewer than 20 points are available.
pub fn volume_trend_delta(volumes: &[f64]) -> f64 {
    if volumes.len() < 20 {
        return 0.0;
    }

    let recent: f64 = volumes.iter().rev().take(5).sum::<f64>() / 5.0;
    let historical: f64 = volumes.iter().rev().take(20).sum::<f64>() / 20.0;
    if historical == 0.0 {
        return 0.0;
    }

    (recent - historical) / historical
}

/// Share of up-closes minus down-closes across the series, in [-1, 1].
pub fn trend_intensity(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }

    let mut positive = 0i64;
    let mut negative = 0i64;
    for pair in series.windows(2) {
        if pair[0] == 0.0 {
            continue;
        }
        let ret = (pair[1] - pair[0]) / pair[0];
        if ret > 0.0 {
            positive += 1;
        } else if ret < 0.0 {
            negative += 1;
        }
    }

    (positive - negative) as f64 / (series.len() - 1) as f64
}

/// Rate of change over `period` bars, as a percentage.
pub fn price_roc(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period {
        return 0.0;
    }

    let current = series[series.len() - 1];
    let old = series[series.len() - period];
    if old == 0.0 {
        return 0.0;
    }

    ((current - old) / old) * 100.0
}

/// Ordinary least-squares slope of value against index.
pub fn linear_regression_slope(series: &[f64]) -> f64 {
    let n = series.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let x_sum: f64 = (0..n).map(|i| i as f64).sum();
    let y_sum: f64 = series.iter().sum();
    let xy_sum: f64 = series.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let x2_sum: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denominator = n_f * x2_sum - x_sum * x_sum;
    if denominator == 0.0 {
        return 0.0;
    }

    (n_f * xy_sum - x_sum * y_sum) / denominator
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueArea {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeProfile {
    /// Point of control: price bin carrying the most volume.
    pub poc: f64,
    pub value_area: ValueArea,
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
    /// POC volume / total volume, in [0, 1].
    pub strength: f64,
}

impl VolumeProfile {
    fn empty() -> Self {
        Self {
            poc: 0.0,
            value_area: ValueArea {
                low: 0.0,
                high: 0.0,
            },
            supports: vec![0.0],
            resistances: vec![0.0],
            strength: 0.5,
        }
    }
}

/// Volume-at-price estimate over fixed-width bins of 10.
///
/// The value area grows outward from the point of control, always taking
/// the heavier neighboring bin, until it covers ~68% of total volume.
/// Its bounds double as support/resistance estimates.
pub fn volume_profile(prices: &[f64], volumes: &[f64]) -> VolumeProfile {
    if prices.is_empty() || volumes.is_empty() {
        return VolumeProfile::empty();
    }

    let mut bins: BTreeMap<i64, f64> = BTreeMap::new();
    for (i, &price) in prices.iter().enumerate() {
        let volume = volumes.get(i).copied().unwrap_or(0.0);
        let bin = (price / 10.0).round() as i64;
        *bins.entry(bin).or_insert(0.0) += volume;
    }

    let total_volume: f64 = bins.values().sum();
    if total_volume <= 0.0 {
        return VolumeProfile::empty();
    }

    let sorted: Vec<(i64, f64)> = bins.into_iter().collect();
    let (mut poc_idx, mut max_volume) = (0usize, 0.0f64);
    for (i, &(_, vol)) in sorted.iter().enumerate() {
        if vol > max_volume {
            max_volume = vol;
            poc_idx = i;
        }
    }

    let value_area_volume = total_volume * 0.68;
    let mut volume_sum = 0.0;
    let mut low_idx = poc_idx;
    let mut high_idx = poc_idx;

    while volume_sum < value_area_volume && (low_idx > 0 || high_idx + 1 < sorted.len()) {
        let low_volume = if low_idx > 0 {
            sorted[low_idx - 1].1
        } else {
            0.0
        };
        let high_volume = if high_idx + 1 < sorted.len() {
            sorted[high_idx + 1].1
        } else {
            0.0
        };

        if low_volume > high_volume {
            volume_sum += low_volume;
            low_idx -= 1;
        } else if high_idx + 1 < sorted.len() {
            volume_sum += high_volume;
            high_idx += 1;
        } else {
            volume_sum += low_volume;
            low_idx -= 1;
        }
    }

    let low = sorted[low_idx].0 as f64 * 10.0;
    let high = sorted[high_idx].0 as f64 * 10.0;

    VolumeProfile {
        poc: sorted[poc_idx].0 as f64 * 10.0,
        value_area: ValueArea { low, high },
        supports: vec![low],
        resistances: vec![high],
        strength: max_volume / total_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_series(value: f64, len: usize) -> Vec<f64> {
        vec![value; len]
    }

    fn rising_series(start: f64, step: f64, len: usize) -> Vec<f64> {
        (0..len).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_sma_ema_converge_on_constant_series() {
        let series = constant_series(42.5, 201);
        for period in [5, 20, 50, 200] {
            assert!((sma(&series, period) - 42.5).abs() < 1e-9);
            let ema_values = ema(&series, period);
            assert!((ema_values.last().unwrap() - 42.5).abs() < 1e-9);
            assert_eq!(ema_values.len(), series.len());
        }
    }

    #[test]
    fn test_sma_empty_is_zero() {
        assert_eq!(sma(&[], 20), 0.0);
    }

    #[test]
    fn test_rsi_neutral_on_flat_and_short_input() {
        assert_eq!(rsi(&constant_series(100.0, 201), 14), 50.0);
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 14), 50.0);
        assert_eq!(rsi(&[], 14), 50.0);
    }

    #[test]
    fn test_rsi_bounds_and_direction() {
        let up = rising_series(100.0, 1.0, 100);
        let down: Vec<f64> = up.iter().rev().cloned().collect();

        let rsi_up = rsi(&up, 14);
        let rsi_down = rsi(&down, 14);
        assert!(rsi_up > 50.0 && rsi_up <= 100.0);
        assert!((0.0..50.0).contains(&rsi_down));
    }

    #[test]
    fn test_stochastic_rsi_bounds() {
        let up = rising_series(50.0, 0.7, 120);
        let value = stochastic_rsi(&up, 14);
        assert!((0.0..=100.0).contains(&value));

        // Flat RSI band resolves to neutral
        assert_eq!(stochastic_rsi(&constant_series(10.0, 120), 14), 50.0);
        assert_eq!(stochastic_rsi(&[1.0, 2.0], 14), 50.0);
    }

    #[test]
    fn test_macd_zero_on_flat_series() {
        let out = macd(&constant_series(250.0, 60));
        assert!(out.value.abs() < 1e-9);
        assert!(out.signal.abs() < 1e-9);
        assert!(out.histogram.abs() < 1e-9);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let out = macd(&rising_series(100.0, 2.0, 120));
        assert!(out.value > 0.0);
    }

    #[test]
    fn test_volatility_bounds_and_fallback() {
        assert_eq!(volatility(&[100.0]), 30.0);
        assert_eq!(volatility(&constant_series(100.0, 50)), 0.0);

        let mut noisy = Vec::new();
        for i in 0..100 {
            noisy.push(if i % 2 == 0 { 100.0 } else { 130.0 });
        }
        let vol = volatility(&noisy);
        assert!((0.0..=100.0).contains(&vol));
        assert!(vol > 50.0);
    }

    #[test]
    fn test_adx_zero_on_short_or_flat_input() {
        assert_eq!(adx(&[1.0, 2.0], 14), 0.0);
        assert_eq!(adx(&constant_series(10.0, 50), 14), 0.0);
    }

    #[test]
    fn test_adx_bounds_on_trend() {
        let value = adx(&rising_series(100.0, 1.5, 60), 14);
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_volume_ratio_defaults_and_spike() {
        assert_eq!(volume_ratio(&[1.0; 10]), 1.0);

        let mut volumes = vec![100.0; 20];
        for v in volumes.iter_mut().rev().take(5) {
            *v = 500.0;
        }
        assert!(volume_ratio(&volumes) > 2.0);
    }

    #[test]
    fn test_linear_regression_slope() {
        assert_eq!(linear_regression_slope(&[5.0]), 0.0);
        let slope = linear_regression_slope(&rising_series(10.0, 3.0, 50));
        assert!((slope - 3.0).abs() < 1e-9);
        assert!(linear_regression_slope(&constant_series(7.0, 50)).abs() < 1e-9);
    }

    #[test]
    fn test_volume_profile_poc_tracks_heaviest_bin() {
        // Most volume trades near 200, some near 100
        let prices: Vec<f64> = (0..50)
            .map(|i| if i < 40 { 200.0 + (i % 5) as f64 } else { 100.0 })
            .collect();
        let volumes = vec![10.0; 50];

        let profile = volume_profile(&prices, &volumes);
        assert!((profile.poc - 200.0).abs() <= 10.0);
        assert!(profile.strength > 0.0 && profile.strength <= 1.0);
        assert!(profile.value_area.high >= profile.value_area.low);
    }

    #[test]
    fn test_volume_profile_empty_input() {
        let profile = volume_profile(&[], &[]);
        assert_eq!(profile.strength, 0.5);
        assert_eq!(profile.poc, 0.0);
    }

    #[test]
    fn test_indicators_are_idempotent() {
        let series = rising_series(100.0, 0.5, 250);
        let volumes = vec![1000.0; 250];

        assert_eq!(rsi(&series, 14), rsi(&series, 14));
        assert_eq!(macd(&series), macd(&series));
        assert_eq!(volatility(&series), volatility(&series));
        assert_eq!(
            volume_profile(&series, &volumes),
            volume_profile(&series, &volumes)
        );
    }
}
