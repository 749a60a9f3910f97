//! Technical indicator implementations.

pub mod ema;
pub mod patterns;
pub mod rsi;
pub mod sma;
pub mod structure;
pub mod volatility;

pub use ema::Ema;
pub use patterns::detect_patterns;
pub use rsi::Rsi;
pub use sma::Sma;
pub use structure::PriceStructure;
pub use volatility::Volatility;

use super::Indicator;
use crate::config::IndicatorConfig;
use crate::types::{IndicatorSnapshot, PriceBar, PricePoint};
use std::collections::BTreeMap;

/// Computes every configured indicator over a daily price series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Enrich each bar with the indicator values available at that point.
    pub fn compute(&self, bars: &[PriceBar]) -> Vec<PricePoint> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let averages: Vec<(usize, Vec<Option<f64>>)> = self
            .config
            .ma_windows
            .iter()
            .map(|&w| (w, Sma::new(w).compute(&closes)))
            .collect();
        let ema = Ema::new(self.config.ema_span).compute(&closes);
        let rsi = Rsi::new(self.config.rsi_window).compute(&closes);
        let volatility = Volatility::new(self.config.volatility_window).compute(&closes);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let moving_averages: BTreeMap<usize, f64> = averages
                    .iter()
                    .filter_map(|(w, values)| values[i].map(|v| (*w, v)))
                    .collect();
                PricePoint {
                    bar: bar.clone(),
                    moving_averages,
                    ema: ema[i].unwrap_or(bar.close),
                    rsi: rsi[i],
                    volatility: volatility[i],
                }
            })
            .collect()
    }

    /// Latest readings plus the price-structure flags for each window.
    ///
    /// Returns `None` for an empty series.
    pub fn snapshot(&self, points: &[PricePoint]) -> Option<IndicatorSnapshot> {
        let latest = points.last()?;
        let closes: Vec<f64> = points.iter().map(|p| p.bar.close).collect();

        let structure: BTreeMap<usize, i8> = self
            .config
            .structure_windows
            .iter()
            .filter_map(|&w| PriceStructure::new(w).latest(&closes).map(|flag| (w, flag)))
            .collect();

        Some(IndicatorSnapshot {
            close: latest.bar.close,
            moving_averages: latest.moving_averages.clone(),
            rsi: latest.rsi,
            volatility: latest.volatility,
            structure,
        })
    }
}
