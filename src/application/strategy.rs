//! Trading-strategy generation: a blended market score mapped to a
//! recommendation, entry/stop/target tiers and a rationale.

use crate::application::confidence;
use crate::domain::analysis::{
    EntryLevels, MarketCondition, MarketPhase, Recommendation, RiskProfile, SentimentSnapshot,
    StopLossLevels, StrategyTimeframe, TargetLevels, TechnicalSignals, TradingStrategy,
};
use tracing::debug;

/// Derive the trading strategy from the already-computed pipeline stages.
pub fn generate(
    current_price: f64,
    condition: &MarketCondition,
    technical: &TechnicalSignals,
    sentiment: &SentimentSnapshot,
    risk: &RiskProfile,
) -> TradingStrategy {
    if current_price <= 0.0 || !current_price.is_finite() {
        return TradingStrategy::fallback(current_price.max(0.0));
    }

    let phase_score = phase_score(condition.phase);
    let momentum_score = rsi_score(technical.momentum.rsi.value);
    let sentiment_score = sentiment.overall.score;
    let risk_score = 100.0 - risk.overall;

    let blended = phase_score * 0.3
        + momentum_score * 0.25
        + sentiment_score * 0.25
        + risk_score * 0.2;

    let recommendation = if blended >= 65.0 {
        Recommendation::StrongBuy
    } else if blended >= 55.0 {
        Recommendation::Buy
    } else if blended <= 35.0 {
        Recommendation::StrongSell
    } else if blended <= 45.0 {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    };

    let confidence = confidence::combine(&[
        phase_score,
        momentum_score,
        sentiment_score,
        risk_score,
    ]);

    debug!(blended, %recommendation, confidence, "generated strategy");

    TradingStrategy {
        recommendation,
        confidence,
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
        timeframe: timeframe(condition, technical),
        rationale: rationale(condition, technical, sentiment, risk),
    }
}

fn phase_score(phase: MarketPhase) -> f64 {
    match phase {
        MarketPhase::Bullish => 70.0,
        MarketPhase::Recovery => 60.0,
        MarketPhase::Sideways | MarketPhase::Analyzing => 50.0,
        MarketPhase::Correction => 40.0,
        MarketPhase::Bearish => 30.0,
    }
}

fn rsi_score(rsi: f64) -> f64 {
    // Overbought reads as a poor entry, oversold as a contrarian buy.
    if rsi > 70.0 {
        35.0
    } else if rsi > 55.0 {
        60.0
    } else if rsi < 30.0 {
        65.0
    } else if rsi < 45.0 {
        40.0
    } else {
        50.0
    }
}

fn timeframe(condition: &MarketCondition, technical: &TechnicalSignals) -> StrategyTimeframe {
    use crate::domain::analysis::RiskLevel;

    if technical.volatility.risk == RiskLevel::High {
        StrategyTimeframe::ShortTerm
    } else if condition.phase == MarketPhase::Sideways {
        StrategyTimeframe::LongTerm
    } else {
        StrategyTimeframe::MediumTerm
    }
}

fn rationale(
    condition: &MarketCondition,
    technical: &TechnicalSignals,
    sentiment: &SentimentSnapshot,
    risk: &RiskProfile,
) -> Vec<String> {
    let mut reasons = vec![format!("Market is in a {} phase", condition.phase)];

    reasons.push(format!(
        "RSI at {:.1} ({})",
        technical.momentum.rsi.value, technical.momentum.rsi.signal
    ));

    reasons.push(format!(
        "Overall sentiment is {} at {:.0}/100",
        sentiment.overall.signal, sentiment.overall.score
    ));

    reasons.push(format!("Composite risk score {:.0}/100", risk.overall));
    if risk.overall > 60.0 {
        reasons.push("Elevated risk suggests smaller position sizing".to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(phase: MarketPhase) -> MarketCondition {
        let mut c = MarketCondition::fallback("bitcoin", 100.0);
        c.phase = phase;
        c
    }

    fn neutral_inputs() -> (TechnicalSignals, SentimentSnapshot, RiskProfile) {
        (
            TechnicalSignals::neutral(),
            SentimentSnapshot::neutral(),
            RiskProfile::fallback(),
        )
    }

    #[test]
    fn test_bullish_inputs_recommend_buying() {
        let (technical, mut sentiment, mut risk) = neutral_inputs();
        sentiment.overall.score = 75.0;
        risk.overall = 25.0;

        let strategy = generate(100.0, &condition(MarketPhase::Bullish), &technical, &sentiment, &risk);
        assert!(matches!(
            strategy.recommendation,
            Recommendation::Buy | Recommendation::StrongBuy
        ));
    }

    #[test]
    fn test_bearish_inputs_recommend_selling() {
        let (technical, mut sentiment, mut risk) = neutral_inputs();
        sentiment.overall.score = 25.0;
        risk.overall = 80.0;

        let strategy = generate(100.0, &condition(MarketPhase::Bearish), &technical, &sentiment, &risk);
        assert!(matches!(
            strategy.recommendation,
            Recommendation::Sell | Recommendation::StrongSell
        ));
    }

    #[test]
    fn test_neutral_inputs_recommend_hold() {
        let (technical, sentiment, risk) = neutral_inputs();
        let strategy = generate(100.0, &condition(MarketPhase::Sideways), &technical, &sentiment, &risk);
        assert_eq!(strategy.recommendation, Recommendation::Hold);
        assert_eq!(strategy.timeframe, StrategyTimeframe::LongTerm);
    }

    #[test]
    fn test_level_tiers_are_ordered() {
        let (technical, sentiment, risk) = neutral_inputs();
        let strategy = generate(200.0, &condition(MarketPhase::Bullish), &technical, &sentiment, &risk);

        assert!(strategy.entries.conservative < strategy.entries.moderate);
        assert!(strategy.entries.moderate < strategy.entries.aggressive);
        assert!(strategy.stop_loss.wide < strategy.stop_loss.normal);
        assert!(strategy.stop_loss.normal < strategy.stop_loss.tight);
        assert!(strategy.targets.primary < strategy.targets.secondary);
        assert!(strategy.targets.secondary < strategy.targets.final_target);
        assert!(strategy.stop_loss.tight < strategy.entries.conservative);
    }

    #[test]
    fn test_high_volatility_shortens_timeframe() {
        use crate::domain::analysis::RiskLevel;

        let (mut technical, sentiment, risk) = neutral_inputs();
        technical.volatility.risk = RiskLevel::High;

        let strategy = generate(100.0, &condition(MarketPhase::Bullish), &technical, &sentiment, &risk);
        assert_eq!(strategy.timeframe, StrategyTimeframe::ShortTerm);
    }

    #[test]
    fn test_rationale_names_the_drivers() {
        let (technical, sentiment, risk) = neutral_inputs();
        let strategy = generate(100.0, &condition(MarketPhase::Recovery), &technical, &sentiment, &risk);

        // Phase names render lowercase.
        assert!(strategy
            .rationale
            .iter()
            .any(|r| r.contains("recovery phase")));
        assert!(strategy.rationale.iter().any(|r| r.contains("RSI")));
        assert!(strategy.rationale.iter().any(|r| r.contains("sentiment")));
        assert!(strategy.rationale.iter().any(|r| r.contains("risk")));
    }
}
