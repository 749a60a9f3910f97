use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CombinedSignal, ScoredArticle, SignalAction, TechnicalResult};

/// Candlestick pattern found on the most recent bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    BullishEngulfing,
    BearishEngulfing,
    #[serde(rename = "bullish_pinbar")]
    BullishPinBar,
    #[serde(rename = "bearish_pinbar")]
    BearishPinBar,
    BreakoutUp,
    BreakoutDown,
}

impl CandlePattern {
    /// Map key used in reports.
    pub fn key(&self) -> &'static str {
        match self {
            Self::BullishEngulfing => "bullish_engulfing",
            Self::BearishEngulfing => "bearish_engulfing",
            Self::BullishPinBar => "bullish_pinbar",
            Self::BearishPinBar => "bearish_pinbar",
            Self::BreakoutUp => "breakout_up",
            Self::BreakoutDown => "breakout_down",
        }
    }

    /// +1 for bullish patterns, -1 for bearish ones.
    pub fn direction(&self) -> i8 {
        match self {
            Self::BullishEngulfing | Self::BullishPinBar | Self::BreakoutUp => 1,
            Self::BearishEngulfing | Self::BearishPinBar | Self::BreakoutDown => -1,
        }
    }
}

/// Everything computed in one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub week_start: NaiveDate,
    pub this_week_articles: u32,
    pub average_weekly_articles: f64,
    pub volume_increase_percent: f64,
    pub news_volume_spike: bool,
    pub latest_price: f64,
    pub technical: TechnicalResult,
    pub sentiment_signal: SignalAction,
    pub sentiment_confidence: f64,
    pub avg_sentiment: f64,
    pub sentiment_std: f64,
    pub combined_signal: CombinedSignal,
    /// Weighted blend of technical and sentiment confidence, one decimal.
    pub combined_confidence: f64,
    /// Detected candlestick patterns keyed by name, valued by direction.
    pub patterns: BTreeMap<String, i8>,
    pub sentiment_articles: Vec<ScoredArticle>,
}
