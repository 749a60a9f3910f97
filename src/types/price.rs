use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily OHLCV bar as delivered by a price source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Bar with open/high/low all equal to the close (useful for close-only feeds).
    pub fn from_close(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}

/// Price bar enriched with the indicator values computed up to and including it.
///
/// Derived fields are `None` (or absent from `moving_averages`) until enough
/// history exists for their window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(flatten)]
    pub bar: PriceBar,
    /// Trailing simple moving averages keyed by window length.
    pub moving_averages: BTreeMap<usize, f64>,
    /// Exponential moving average of the close.
    pub ema: f64,
    /// 14-period RSI using simple rolling means.
    pub rsi: Option<f64>,
    /// Rolling standard deviation of closes (ATR-like volatility proxy).
    pub volatility: Option<f64>,
}

impl PricePoint {
    /// Moving average for a window, if it was configured and is available yet.
    pub fn ma(&self, window: usize) -> Option<f64> {
        self.moving_averages.get(&window).copied()
    }
}

/// Latest indicator readings, the input of the technical signal generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub moving_averages: BTreeMap<usize, f64>,
    pub rsi: Option<f64>,
    pub volatility: Option<f64>,
    /// Price-structure flag per window: +1 near support, -1 near resistance, 0 otherwise.
    pub structure: BTreeMap<usize, i8>,
}

impl IndicatorSnapshot {
    pub fn ma(&self, window: usize) -> Option<f64> {
        self.moving_averages.get(&window).copied()
    }

    /// Structure flag for a window, neutral when the window was not computable.
    pub fn structure_flag(&self, window: usize) -> i8 {
        self.structure.get(&window).copied().unwrap_or(0)
    }
}
