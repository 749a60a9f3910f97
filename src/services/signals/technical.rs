//! Technical signal generator.
//!
//! Folds trend, RSI, price-structure and news-volume readings into one
//! weighted score, dampens confidence in volatile markets and maps the
//! score onto BUY/SELL/HOLD.

use std::collections::BTreeMap;

use crate::config::IndicatorConfig;
use crate::types::{IndicatorSnapshot, SignalAction, TechnicalResult};

const TREND_WEIGHT: f64 = 0.35;
const RSI_WEIGHT: f64 = 0.20;
const STRUCTURE_WEIGHT: f64 = 0.25;
const VOLUME_WEIGHT: f64 = 0.10;

/// Blend of the structure windows, concentrated on 30-60 days.
const STRUCTURE_BLEND: [(usize, f64); 5] = [(15, 0.10), (30, 0.25), (45, 0.30), (60, 0.25), (90, 0.10)];

/// Scores are expressed on the scale of four unit components.
const COMPONENT_COUNT: f64 = 4.0;
const SIGNAL_THRESHOLD: f64 = 2.0;

const RSI_OVERSOLD: f64 = 40.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Bearish scores are amplified, bullish ones dampened.
const BEARISH_ASYMMETRY: f64 = 1.1;
const BULLISH_ASYMMETRY: f64 = 0.95;

/// Volatility relative to price that maps to the floor of the dampening range.
const VOLATILITY_SENSITIVITY: f64 = 10.0;
const MIN_VOLATILITY_FACTOR: f64 = 0.5;

/// Produces a [`TechnicalResult`] from the latest indicator snapshot.
#[derive(Debug, Clone)]
pub struct TechnicalSignalGenerator {
    /// (fast, slow) moving-average windows for short, medium and long trend.
    trend_pairs: [(usize, usize); 3],
    structure_weights: Vec<(usize, f64)>,
}

impl Default for TechnicalSignalGenerator {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

impl TechnicalSignalGenerator {
    pub fn new(config: &IndicatorConfig) -> Self {
        let ma = |i: usize, fallback: usize| config.ma_windows.get(i).copied().unwrap_or(fallback);
        let trend_pairs = [(ma(0, 10), ma(1, 20)), (ma(1, 20), ma(2, 50)), (ma(2, 50), ma(3, 200))];
        Self {
            trend_pairs,
            structure_weights: structure_weights(&config.structure_windows),
        }
    }

    pub fn generate(&self, snapshot: &IndicatorSnapshot, volume_flag: bool) -> TechnicalResult {
        let mut components = BTreeMap::new();

        let trends: Vec<f64> = self
            .trend_pairs
            .iter()
            .map(|&(fast, slow)| trend_direction(snapshot.ma(fast), snapshot.ma(slow)))
            .collect();
        for (name, value) in ["trend_short", "trend_medium", "trend_long"].iter().zip(&trends) {
            components.insert(name.to_string(), *value);
        }
        let trend = trends.iter().sum::<f64>() / trends.len() as f64;
        components.insert("trend".to_string(), trend);

        let rsi = rsi_score(snapshot.rsi);
        components.insert("rsi".to_string(), rsi);

        let mut structure = 0.0;
        for &(window, weight) in &self.structure_weights {
            let flag = snapshot.structure_flag(window) as f64;
            components.insert(format!("price_structure_{}", window), flag);
            structure += weight * flag;
        }
        components.insert("price_structure".to_string(), structure);

        let volume = if volume_flag { 1.0 } else { 0.0 };
        components.insert("volume".to_string(), volume);

        let vol_factor = volatility_factor(snapshot.volatility, snapshot.close);
        components.insert("volatility_factor".to_string(), vol_factor);

        let contributions = [
            TREND_WEIGHT * trend,
            RSI_WEIGHT * rsi,
            STRUCTURE_WEIGHT * structure,
            VOLUME_WEIGHT * volume,
        ];
        let max_weighted = TREND_WEIGHT + RSI_WEIGHT + STRUCTURE_WEIGHT + VOLUME_WEIGHT;

        let raw = contributions.iter().sum::<f64>() / (max_weighted / COMPONENT_COUNT);
        let score = if raw < 0.0 {
            raw * BEARISH_ASYMMETRY
        } else {
            raw * BULLISH_ASYMMETRY
        };
        let signal = SignalAction::from_score(score, SIGNAL_THRESHOLD);

        let weighted_abs: f64 = contributions.iter().map(|c| c.abs()).sum();
        let confidence =
            ((weighted_abs / max_weighted) * vol_factor * score.abs().max(1.0) * 100.0).clamp(0.0, 100.0);

        TechnicalResult {
            signal,
            score,
            confidence: round_to(confidence, 1),
            components,
        }
    }
}

/// +1 when the fast average is above the slow one, -1 below, 0 when equal or undefined.
fn trend_direction(fast: Option<f64>, slow: Option<f64>) -> f64 {
    match (fast, slow) {
        (Some(f), Some(s)) if f > s => 1.0,
        (Some(f), Some(s)) if f < s => -1.0,
        _ => 0.0,
    }
}

/// Oversold RSI is bullish, overbought bearish; undefined RSI is neutral.
fn rsi_score(rsi: Option<f64>) -> f64 {
    match rsi {
        Some(r) if r < RSI_OVERSOLD => 1.0,
        Some(r) if r > RSI_OVERBOUGHT => -1.0,
        _ => 0.0,
    }
}

/// Confidence multiplier in [0.5, 1.0]; 1.0 when volatility is unknown.
pub fn volatility_factor(volatility: Option<f64>, close: f64) -> f64 {
    match volatility {
        Some(v) if close > 0.0 => {
            (1.0 - VOLATILITY_SENSITIVITY * (v / close)).clamp(MIN_VOLATILITY_FACTOR, 1.0)
        }
        _ => 1.0,
    }
}

/// Weights for the configured structure windows, normalized to sum to 1.
///
/// Windows outside the standard blend share the weight equally.
fn structure_weights(windows: &[usize]) -> Vec<(usize, f64)> {
    if windows.is_empty() {
        return Vec::new();
    }
    let known: Option<Vec<(usize, f64)>> = windows
        .iter()
        .map(|w| STRUCTURE_BLEND.iter().find(|(bw, _)| bw == w).copied())
        .collect();
    match known {
        Some(weights) => {
            let total: f64 = weights.iter().map(|(_, wt)| wt).sum();
            weights.into_iter().map(|(w, wt)| (w, wt / total)).collect()
        }
        None => {
            let share = 1.0 / windows.len() as f64;
            windows.iter().map(|&w| (w, share)).collect()
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
