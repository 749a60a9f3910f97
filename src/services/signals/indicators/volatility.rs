//! Rolling close standard deviation, used as an ATR-like volatility proxy.

use crate::services::signals::Indicator;

/// Sample standard deviation (n - 1 denominator) of the last `period` closes.
pub struct Volatility {
    period: usize,
}

impl Default for Volatility {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Volatility {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Volatility {
    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period < 2 || closes.len() < self.period {
            return out;
        }

        // Shift by the first close to keep the sum of squares well conditioned.
        let shift = closes[0];
        let n = self.period as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for (i, &close) in closes.iter().enumerate() {
            let x = close - shift;
            sum += x;
            sum_sq += x * x;
            if i >= self.period {
                let old = closes[i - self.period] - shift;
                sum -= old;
                sum_sq -= old * old;
            }
            if i + 1 >= self.period {
                let variance = ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0);
                out[i] = Some(variance.sqrt());
            }
        }
        out
    }
}
