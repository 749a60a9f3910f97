//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;

/// EMA (Exponential Moving Average) indicator.
///
/// Recursive with `alpha = 2 / (span + 1)`, seeded with the first close,
/// so it is defined from the first point onward.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Default for Ema {
    fn default() -> Self {
        Self { span: 10 }
    }
}

impl Indicator for Ema {
    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(closes.len());
        let mut prev: Option<f64> = None;
        for &close in closes {
            let value = match prev {
                Some(p) => close * alpha + p * (1.0 - alpha),
                None => close,
            };
            out.push(Some(value));
            prev = Some(value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_with_first_close() {
        let values = Ema::new(10).compute(&[50.0, 60.0]);
        assert_eq!(values[0], Some(50.0));
    }

    #[test]
    fn test_ema_recursion() {
        let ema = Ema::new(3);
        assert!((ema.alpha() - 0.5).abs() < 1e-12);
        let values = ema.compute(&[10.0, 20.0, 30.0]);
        assert_eq!(values[1], Some(15.0));
        assert_eq!(values[2], Some(22.5));
    }

    #[test]
    fn test_ema_lags_uptrend() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let values = Ema::default().compute(&closes);
        let last = values.last().copied().flatten().unwrap();
        assert!(last < *closes.last().unwrap());
        assert!(last > closes[0]);
    }
}
