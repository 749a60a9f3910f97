use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl SignalAction {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            "HOLD" => Some(Self::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }

    /// Directional sign: +1 for BUY, -1 for SELL, 0 for HOLD.
    pub fn direction(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
            Self::Hold => 0,
        }
    }

    /// Map a score onto an action using symmetric thresholds.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Self::Buy
        } else if score <= -threshold {
            Self::Sell
        } else {
            Self::Hold
        }
    }
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    /// Directional momentum dominates.
    Trending,
    /// Mean reversion dominates.
    #[default]
    Ranging,
}

impl Regime {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TRENDING" => Some(Self::Trending),
            "RANGING" => Some(Self::Ranging),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trending => "TRENDING",
            Self::Ranging => "RANGING",
        }
    }
}

/// Output of the technical signal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalResult {
    pub signal: SignalAction,
    pub score: f64,
    /// Confidence percentage in [0, 100].
    pub confidence: f64,
    /// Named sub-scores that went into the score.
    pub components: BTreeMap<String, f64>,
}

impl TechnicalResult {
    pub fn component(&self, name: &str) -> f64 {
        self.components.get(name).copied().unwrap_or(0.0)
    }
}

/// Output of the sentiment aggregator for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Signed mean of the five highest-impact articles; drives direction.
    pub avg_sentiment: f64,
    /// Signed mean of the ten highest-impact articles; drives confidence.
    pub confidence_sentiment: f64,
    /// Population standard deviation of the top-ten scores (0 below three articles).
    pub sentiment_std: f64,
    pub volume_flag: bool,
    pub this_week_count: u32,
    pub avg_weekly_count: f64,
    pub volume_increase_pct: f64,
    pub signal: SignalAction,
    /// Confidence percentage in [0, 100].
    pub confidence: f64,
    pub articles: Vec<super::ScoredArticle>,
}

/// Final fused decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSignal {
    pub signal: SignalAction,
    pub score: f64,
    /// Confidence percentage in [0, 100], one decimal.
    pub confidence: f64,
    pub regime: Regime,
    pub explanation: String,
}

/// One row of persisted signal history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub price: f64,
    pub technical_signal: SignalAction,
    pub technical_confidence: f64,
    pub sentiment_signal: SignalAction,
    pub sentiment_confidence: f64,
    pub combined_signal: SignalAction,
    pub combined_confidence: f64,
    pub regime: Regime,
    pub explanation: String,
}
