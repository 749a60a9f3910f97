//! Price-structure flag: is the close sitting near support or resistance?

use std::collections::VecDeque;

/// Close within this factor above the rolling minimum counts as near support.
const SUPPORT_BAND: f64 = 1.05;
/// Close within this factor below the rolling maximum counts as near resistance.
const RESISTANCE_BAND: f64 = 0.97;

/// Rolling min/max over a fixed window.
///
/// Both extremes are tracked with monotonic deques of indices, so a full
/// pass is O(N) regardless of the window length.
pub struct PriceStructure {
    window: usize,
}

impl PriceStructure {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Classify a close against the window extremes.
    ///
    /// Support is checked first, so a tight range where both bands apply
    /// reads as support.
    pub fn classify(close: f64, low: f64, high: f64) -> i8 {
        if close <= low * SUPPORT_BAND {
            1
        } else if close >= high * RESISTANCE_BAND {
            -1
        } else {
            0
        }
    }

    /// Flag for every point; `None` until `window` closes are available.
    pub fn flags(&self, closes: &[f64]) -> Vec<Option<i8>> {
        let mut out = vec![None; closes.len()];
        if self.window == 0 {
            return out;
        }

        let mut min_q: VecDeque<usize> = VecDeque::new();
        let mut max_q: VecDeque<usize> = VecDeque::new();
        for (i, &close) in closes.iter().enumerate() {
            while min_q.back().is_some_and(|&j| closes[j] >= close) {
                min_q.pop_back();
            }
            min_q.push_back(i);
            while max_q.back().is_some_and(|&j| closes[j] <= close) {
                max_q.pop_back();
            }
            max_q.push_back(i);

            if i >= self.window {
                let expired = i - self.window;
                if min_q.front() == Some(&expired) {
                    min_q.pop_front();
                }
                if max_q.front() == Some(&expired) {
                    max_q.pop_front();
                }
            }

            if i + 1 >= self.window {
                if let (Some(&lo), Some(&hi)) = (min_q.front(), max_q.front()) {
                    out[i] = Some(Self::classify(close, closes[lo], closes[hi]));
                }
            }
        }
        out
    }

    /// Flag for the most recent close, if the window is available.
    pub fn latest(&self, closes: &[f64]) -> Option<i8> {
        self.flags(closes).last().copied().flatten()
    }
}
