//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;

/// SMA (Simple Moving Average) indicator.
///
/// Trailing mean of the last `period` closes, maintained as a sliding sum.
/// Undefined until `period` closes are available.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period == 0 {
            return out;
        }

        let mut sum = 0.0;
        for (i, &close) in closes.iter().enumerate() {
            sum += close;
            if i >= self.period {
                sum -= closes[i - self.period];
            }
            if i + 1 >= self.period {
                out[i] = Some(sum / self.period as f64);
            }
        }
        out
    }
}
