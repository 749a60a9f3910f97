//! Candlestick pattern detection on the latest bars.
//!
//! Patterns are reported alongside the decision but do not feed the score.

use crate::types::{CandlePattern, PriceBar};

/// Lookback for the breakout range, excluding the latest bar.
const BREAKOUT_LOOKBACK: usize = 20;

/// Detect engulfing, pin bar and breakout patterns on the most recent bar.
///
/// At most one pattern per family is reported.
pub fn detect_patterns(bars: &[PriceBar]) -> Vec<CandlePattern> {
    let mut patterns = Vec::new();
    let (latest, prev) = match bars {
        [.., prev, latest] => (latest, prev),
        _ => return patterns,
    };

    if let Some(p) = engulfing(prev, latest) {
        patterns.push(p);
    }
    if let Some(p) = pin_bar(latest) {
        patterns.push(p);
    }
    if let Some(p) = breakout(bars) {
        patterns.push(p);
    }
    patterns
}

fn engulfing(prev: &PriceBar, latest: &PriceBar) -> Option<CandlePattern> {
    let latest_up = latest.close > latest.open;
    let latest_down = latest.close < latest.open;
    let prev_up = prev.close > prev.open;
    let prev_down = prev.close < prev.open;

    if latest_up && prev_down && latest.close > prev.open && latest.open < prev.close {
        Some(CandlePattern::BullishEngulfing)
    } else if latest_down && prev_up && latest.open > prev.close && latest.close < prev.open {
        Some(CandlePattern::BearishEngulfing)
    } else {
        None
    }
}

fn pin_bar(bar: &PriceBar) -> Option<CandlePattern> {
    let body = (bar.close - bar.open).abs();
    let upper_wick = bar.high - bar.close.max(bar.open);
    let lower_wick = bar.close.min(bar.open) - bar.low;

    if lower_wick > body * 2.0 && upper_wick < body {
        Some(CandlePattern::BullishPinBar)
    } else if upper_wick > body * 2.0 && lower_wick < body {
        Some(CandlePattern::BearishPinBar)
    } else {
        None
    }
}

fn breakout(bars: &[PriceBar]) -> Option<CandlePattern> {
    if bars.len() < BREAKOUT_LOOKBACK + 1 {
        return None;
    }
    let latest = bars.last()?;
    let range = &bars[bars.len() - 1 - BREAKOUT_LOOKBACK..bars.len() - 1];
    let recent_high = range.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let recent_low = range.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    if latest.close > recent_high {
        Some(CandlePattern::BreakoutUp)
    } else if latest.close < recent_low {
        Some(CandlePattern::BreakoutDown)
    } else {
        None
    }
}
