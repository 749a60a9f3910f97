//! Trading signals service module.
//!
//! Provides the indicator engine, the technical signal generator and the
//! fusion of technical and sentiment signals into the final decision.

pub mod fusion;
pub mod indicators;
pub mod technical;

pub use fusion::{blended_confidence, detect_regime, explain, FusionEngine};
pub use indicators::{detect_patterns, IndicatorEngine, PriceStructure};
pub use technical::TechnicalSignalGenerator;

/// Trait for rolling indicators computed over a close series.
pub trait Indicator: Send + Sync {
    /// Number of closes needed before the first value is defined.
    fn min_periods(&self) -> usize;

    /// One value per close, `None` where the window is not yet filled.
    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>>;
}
