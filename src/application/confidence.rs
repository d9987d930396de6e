//! Shared confidence combinator: weighted blend plus agreement penalty.
//!
//! The same pattern backs market-phase, sentiment and risk confidence
//! figures, so it lives here once.

use statrs::statistics::{Data, Distribution};

/// Combine indicator readings (roughly 0-100 scaled) into a confidence
/// figure in [30, 95].
///
/// Earlier entries carry more weight (1 - index * 0.1, floored just
/// above zero). Disagreement between inputs shrinks the result through
/// an agreement factor of max(0.5, 1 - stddev/50). Empty input yields
/// the neutral 50.
pub fn combine(indicators: &[f64]) -> f64 {
    if indicators.is_empty() {
        return 50.0;
    }

    let weights: Vec<f64> = (0..indicators.len())
        .map(|i| (1.0 - i as f64 * 0.1).max(0.05))
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    let weighted_sum: f64 = indicators
        .iter()
        .zip(weights.iter())
        .map(|(value, weight)| value * weight)
        .sum();
    let base = weighted_sum / weight_sum;

    let data = Data::new(indicators.to_vec());
    let std_dev = population_std_dev(&data, indicators.len());

    let agreement = (1.0 - std_dev / 50.0).max(0.5);
    (base * agreement).clamp(30.0, 95.0)
}

fn population_std_dev(data: &Data<Vec<f64>>, n: usize) -> f64 {
    // statrs reports the sample variance; rescale to the population
    // figure the combinator is specified against.
    match data.variance() {
        Some(sample_variance) if n > 1 => {
            (sample_variance * (n as f64 - 1.0) / n as f64).sqrt()
        }
        _ => 0.0,
    }
}
