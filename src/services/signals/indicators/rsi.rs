//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;

const EPSILON: f64 = 1e-10;

/// RSI (Relative Strength Index) indicator.
///
/// Ratio of the simple rolling mean of gains to that of losses over the
/// last `period` close-to-close changes. Values range from 0-100 and are
/// exactly 100 when the window contains no losses.
///
/// The first change needs two closes, so the first defined value is at
/// index `period`.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64, losses_in_window: usize) -> f64 {
        if losses_in_window == 0 {
            return 100.0;
        }
        let rs = avg_gain / (avg_loss + EPSILON);
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}

impl Indicator for Rsi {
    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period == 0 || closes.len() < self.period + 1 {
            return out;
        }

        // changes[k] is the move into close k + 1
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        let mut losses = 0usize;
        for (k, &change) in changes.iter().enumerate() {
            if change > 0.0 {
                gain_sum += change;
            } else if change < 0.0 {
                loss_sum -= change;
                losses += 1;
            }

            if k >= self.period {
                let old = changes[k - self.period];
                if old > 0.0 {
                    gain_sum -= old;
                } else if old < 0.0 {
                    loss_sum += old;
                    losses -= 1;
                }
            }

            if k + 1 >= self.period {
                let n = self.period as f64;
                // Sliding sums can drift slightly negative.
                let avg_gain = gain_sum.max(0.0) / n;
                let avg_loss = loss_sum.max(0.0) / n;
                out[k + 1] = Some(Self::value(avg_gain, avg_loss, losses));
            }
        }
        out
    }
}
