//! Value objects produced by the analysis pipeline.
//!
//! Every record here is recomputed per request and immutable after
//! creation. Constructors ending in `neutral` or `fallback` build the
//! documented defaults used when upstream data is missing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Warning attached to every default analysis object.
pub const DATA_UNAVAILABLE_WARNING: &str = "Using default analysis due to data unavailability";

/// Discrete market phase from the moving-average decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPhase {
    Bullish,
    Bearish,
    Correction,
    Recovery,
    Sideways,
    /// Fallback phase when the classifier could not run.
    Analyzing,
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketPhase::Bullish => write!(f, "bullish"),
            MarketPhase::Bearish => write!(f, "bearish"),
            MarketPhase::Correction => write!(f, "correction"),
            MarketPhase::Recovery => write!(f, "recovery"),
            MarketPhase::Sideways => write!(f, "sideways"),
            MarketPhase::Analyzing => write!(f, "analyzing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::StrongBullish => write!(f, "Strong Bullish"),
            TrendDirection::Bullish => write!(f, "Bullish"),
            TrendDirection::Neutral => write!(f, "Neutral"),
            TrendDirection::Bearish => write!(f, "Bearish"),
            TrendDirection::StrongBearish => write!(f, "Strong Bearish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Significance {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTrendDirection {
    Increasing,
    Decreasing,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for SentimentSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentSignal::Bullish => write!(f, "bullish"),
            SentimentSignal::Bearish => write!(f, "bearish"),
            SentimentSignal::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketFlow {
    Inflow,
    Outflow,
    Stable,
}

/// Single indicator reading plus its textual interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub value: f64,
    pub signal: String,
}

impl IndicatorReading {
    pub fn neutral(value: f64) -> Self {
        Self {
            value,
            signal: "neutral".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSignal {
    pub primary: TrendDirection,
    pub secondary: TrendDirection,
    /// 0..=1, from the volume-profile strength estimate.
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumSignals {
    pub rsi: IndicatorReading,
    pub macd: IndicatorReading,
    pub stoch_rsi: IndicatorReading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilitySignal {
    pub current: f64,
    pub trend: VolatilityTrend,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSignal {
    pub change: f64,
    pub trend: VolumeTrendDirection,
    pub significance: Significance,
}

/// Technical snapshot consumed by every downstream stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSignals {
    pub trend: TrendSignal,
    pub momentum: MomentumSignals,
    pub volatility: VolatilitySignal,
    pub volume: VolumeSignal,
}

impl TechnicalSignals {
    pub fn neutral() -> Self {
        Self {
            trend: TrendSignal {
                primary: TrendDirection::Neutral,
                secondary: TrendDirection::Neutral,
                strength: 0.5,
            },
            momentum: MomentumSignals {
                rsi: IndicatorReading::neutral(50.0),
                macd: IndicatorReading::neutral(0.0),
                stoch_rsi: IndicatorReading::neutral(50.0),
            },
            volatility: VolatilitySignal {
                current: 30.0,
                trend: VolatilityTrend::Stable,
                risk: RiskLevel::Low,
            },
            volume: VolumeSignal {
                change: 1.0,
                trend: VolumeTrendDirection::Neutral,
                significance: Significance::Moderate,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyLevels {
    pub strong_support: f64,
    pub support: f64,
    pub pivot: f64,
    pub resistance: f64,
    pub strong_resistance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCondition {
    pub phase: MarketPhase,
    /// 0..=1
    pub strength: f64,
    /// 0..=100
    pub confidence: f64,
    pub key_levels: KeyLevels,
}

/// Static price bands used when the classifier cannot run. Unknown
/// symbols get +/-5% of the current price.
const FALLBACK_BANDS: &[(&str, f64, f64)] = &[
    ("bitcoin", 65000.0, 70000.0),
    ("ethereum", 2300.0, 2500.0),
    ("binancecoin", 280.0, 320.0),
    ("cardano", 0.45, 0.55),
    ("solana", 90.0, 110.0),
];

impl MarketCondition {
    pub fn fallback(coin: &str, current_price: f64) -> Self {
        let coin_lower = coin.to_lowercase();
        let (support, resistance) = FALLBACK_BANDS
            .iter()
            .find(|(id, _, _)| *id == coin_lower)
            .map(|(_, s, r)| (*s, *r))
            .unwrap_or((current_price * 0.95, current_price * 1.05));

        Self {
            phase: MarketPhase::Analyzing,
            strength: 0.5,
            confidence: 50.0,
            key_levels: KeyLevels {
                strong_support: support * 0.98,
                support,
                pivot: current_price,
                resistance,
                strong_resistance: resistance * 1.02,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallSentiment {
    pub score: f64,
    pub signal: SentimentSignal,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsComponent {
    pub score: f64,
    /// Titles of the most recent articles considered.
    pub recent: Vec<String>,
    pub trend: SentimentSignal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialComponent {
    pub score: f64,
    pub trend: SentimentSignal,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketComponent {
    pub score: f64,
    pub dominance: f64,
    pub flow: MarketFlow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentComponents {
    pub news: NewsComponent,
    pub social: SocialComponent,
    pub market: MarketComponent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub overall: OverallSentiment,
    pub components: SentimentComponents,
}

impl SentimentSnapshot {
    pub fn neutral() -> Self {
        Self {
            overall: OverallSentiment {
                score: 50.0,
                signal: SentimentSignal::Neutral,
                confidence: 50.0,
            },
            components: SentimentComponents {
                news: NewsComponent {
                    score: 50.0,
                    recent: Vec::new(),
                    trend: SentimentSignal::Neutral,
                },
                social: SocialComponent {
                    score: 50.0,
                    trend: SentimentSignal::Neutral,
                    volume: 1.0,
                },
                market: MarketComponent {
                    score: 50.0,
                    dominance: 50.0,
                    flow: MarketFlow::Stable,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactors {
    pub technical: f64,
    pub fundamental: f64,
    pub sentiment: f64,
    pub market: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// 0..=100
    pub overall: f64,
    pub factors: RiskFactors,
    pub warnings: Vec<String>,
}

impl RiskProfile {
    pub fn fallback() -> Self {
        Self {
            overall: 50.0,
            factors: RiskFactors {
                technical: 50.0,
                fundamental: 50.0,
                sentiment: 50.0,
                market: 50.0,
            },
            warnings: vec![DATA_UNAVAILABLE_WARNING.to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub price: PriceRange,
    /// 30..=95
    pub confidence: f64,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub short_term: Prediction,
    pub mid_term: Prediction,
    pub long_term: Prediction,
}

impl PredictionSet {
    pub fn fallback(current_price: f64) -> Self {
        let default_band = |pct: f64, confidence: f64| Prediction {
            price: PriceRange {
                low: current_price * (1.0 - pct),
                high: current_price * (1.0 + pct),
            },
            confidence,
            signals: vec!["Default prediction".to_string()],
        };

        Self {
            short_term: default_band(0.05, 50.0),
            mid_term: default_band(0.10, 40.0),
            long_term: default_band(0.15, 30.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StrongBuy => write!(f, "Strong Buy"),
            Recommendation::Buy => write!(f, "Buy"),
            Recommendation::Hold => write!(f, "Hold"),
            Recommendation::Sell => write!(f, "Sell"),
            Recommendation::StrongSell => write!(f, "Strong Sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyTimeframe {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl fmt::Display for StrategyTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyTimeframe::ShortTerm => write!(f, "Short-term"),
            StrategyTimeframe::MediumTerm => write!(f, "Medium-term"),
            StrategyTimeframe::LongTerm => write!(f, "Long-term"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLevels {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLossLevels {
    pub tight: f64,
    pub normal: f64,
    pub wide: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetLevels {
    pub primary: f64,
    pub secondary: f64,
    pub final_target: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingStrategy {
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub entries: EntryLevels,
    pub stop_loss: StopLossLevels,
    pub targets: TargetLevels,
    pub timeframe: StrategyTimeframe,
    pub rationale: Vec<String>,
}

impl TradingStrategy {
    pub fn fallback(current_price: f64) -> Self {
        Self {
            recommendation: Recommendation::Hold,
            confidence: 50.0,
            entries: EntryLevels {
                conservative: current_price * 0.98,
                moderate: current_price,
                aggressive: current_price * 1.02,
            },
            stop_loss: StopLossLevels {
                tight: current_price * 0.95,
                normal: current_price * 0.93,
                wide: current_price * 0.90,
            },
            targets: TargetLevels {
                primary: current_price * 1.05,
                secondary: current_price * 1.10,
                final_target: current_price * 1.15,
            },
            timeframe: StrategyTimeframe::MediumTerm,
            rationale: vec![DATA_UNAVAILABLE_WARNING.to_string()],
        }
    }
}

/// Aggregate output of one full analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub market_condition: MarketCondition,
    pub technical_signals: TechnicalSignals,
    pub sentiment_analysis: SentimentSnapshot,
    pub predictions: PredictionSet,
    pub risk_analysis: RiskProfile,
    pub trading_strategy: TradingStrategy,
}

impl Analysis {
    /// Complete renderable default, used when the pipeline cannot run.
    pub fn fallback(coin: &str, current_price: f64) -> Self {
        Self {
            market_condition: MarketCondition::fallback(coin, current_price),
            technical_signals: TechnicalSignals::neutral(),
            sentiment_analysis: SentimentSnapshot::neutral(),
            predictions: PredictionSet::fallback(current_price),
            risk_analysis: RiskProfile::fallback(),
            trading_strategy: TradingStrategy::fallback(current_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_analysis_is_renderable() {
        let analysis = Analysis::fallback("dogecoin", 0.1);

        assert_eq!(analysis.market_condition.phase, MarketPhase::Analyzing);
        assert!(analysis.market_condition.key_levels.support > 0.0);
        assert!(
            analysis
                .risk_analysis
                .warnings
                .iter()
                .any(|w| w == DATA_UNAVAILABLE_WARNING)
        );
    }

    #[test]
    fn test_fallback_uses_known_symbol_bands() {
        let analysis = Analysis::fallback("Bitcoin", 68000.0);
        let levels = &analysis.market_condition.key_levels;

        assert_eq!(levels.support, 65000.0);
        assert_eq!(levels.resistance, 70000.0);
        assert_eq!(levels.pivot, 68000.0);
    }

    #[test]
    fn test_trend_direction_display() {
        assert_eq!(TrendDirection::StrongBullish.to_string(), "Strong Bullish");
        assert_eq!(TrendDirection::Bearish.to_string(), "Bearish");
    }
}
