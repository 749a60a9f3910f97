//! Fusion of the technical and sentiment signals into the final decision.

use crate::types::{CombinedSignal, Regime, SignalAction, TechnicalResult};

use super::technical::round_to;

const TECHNICAL_WEIGHT: f64 = 0.6;
const SENTIMENT_WEIGHT: f64 = 0.4;
const SIGNAL_THRESHOLD: f64 = 0.6;

const BEARISH_ASYMMETRY: f64 = 1.15;
const BULLISH_ASYMMETRY: f64 = 0.95;

/// Minimum summed |trend| for a trending regime.
const TRENDING_STRENGTH: f64 = 2.0;
/// Volatility factor must exceed this for a trending regime.
const TRENDING_VOLATILITY: f64 = 0.9;

/// Weights of the reported blended confidence.
const TECH_CONFIDENCE_SHARE: f64 = 0.7;
const SENTIMENT_CONFIDENCE_SHARE: f64 = 0.3;

/// Combines technical and sentiment outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionEngine;

impl FusionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn fuse(
        &self,
        technical: &TechnicalResult,
        sentiment_signal: SignalAction,
        avg_sentiment: f64,
    ) -> CombinedSignal {
        let sentiment_direction = sentiment_signal.direction() as f64;

        let weighted_tech = technical.score * (technical.confidence / 100.0) * TECHNICAL_WEIGHT;
        let weighted_sentiment =
            sentiment_direction * avg_sentiment.abs().clamp(0.0, 1.0) * SENTIMENT_WEIGHT;

        let mut score = weighted_tech + weighted_sentiment;
        score *= if score < 0.0 {
            BEARISH_ASYMMETRY
        } else {
            BULLISH_ASYMMETRY
        };

        let signal = SignalAction::from_score(score, SIGNAL_THRESHOLD);
        let regime = detect_regime(technical);

        let alignment = alignment(sign(technical.score), sentiment_signal.direction());
        let confidence = round_to((score.abs() * 100.0).min(100.0) * alignment, 1);

        CombinedSignal {
            signal,
            score: round_to(score, 2),
            confidence,
            regime,
            explanation: explain(technical.signal, sentiment_signal, regime),
        }
    }
}

/// TRENDING when the trend components mostly agree and the market is calm.
pub fn detect_regime(technical: &TechnicalResult) -> Regime {
    let strength = technical.component("trend_short").abs()
        + technical.component("trend_medium").abs()
        + technical.component("trend_long").abs();
    let volatility = technical
        .components
        .get("volatility_factor")
        .copied()
        .unwrap_or(1.0);

    if strength >= TRENDING_STRENGTH && volatility > TRENDING_VOLATILITY {
        Regime::Trending
    } else {
        Regime::Ranging
    }
}

/// 1.0 when directions match (including both neutral), 0.8 when one side
/// is neutral, 0.5 when they conflict.
fn alignment(tech_direction: i8, sentiment_direction: i8) -> f64 {
    if tech_direction == sentiment_direction {
        1.0
    } else if tech_direction == 0 || sentiment_direction == 0 {
        0.8
    } else {
        0.5
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Fixed sentences for technical, sentiment and regime, space separated.
pub fn explain(technical: SignalAction, sentiment: SignalAction, regime: Regime) -> String {
    let mut reasons: Vec<&str> = Vec::with_capacity(3);

    match technical {
        SignalAction::Sell => reasons.push("Price is overextended near resistance with high RSI."),
        SignalAction::Buy => reasons.push("Price is near support with bullish structure."),
        SignalAction::Hold => {}
    }

    match sentiment {
        SignalAction::Buy => reasons.push("News sentiment is strongly positive."),
        SignalAction::Sell => reasons.push("News sentiment is negative and risk-off."),
        SignalAction::Hold => {}
    }

    reasons.push(match regime {
        Regime::Ranging => "Market is in a ranging regime; mean-reversion dominates.",
        Regime::Trending => "Market is in a trending regime; momentum dominates.",
    });

    reasons.join(" ")
}

/// Reported confidence blending technical and sentiment confidence, one decimal.
pub fn blended_confidence(technical_confidence: f64, sentiment_confidence: f64) -> f64 {
    let blended = technical_confidence * TECH_CONFIDENCE_SHARE
        + sentiment_confidence * SENTIMENT_CONFIDENCE_SHARE;
    round_to(blended.clamp(0.0, 100.0), 1)
}
