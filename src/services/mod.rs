pub mod pipeline;
pub mod sentiment;
pub mod signals;
pub mod sqlite_store;

pub use pipeline::{week_start, AnalysisInput, AnalysisOutcome, SignalPipeline};
pub use sentiment::{ArticleScorer, LexiconAnalyzer, SentimentAggregator};
pub use signals::{FusionEngine, IndicatorEngine, TechnicalSignalGenerator};
pub use sqlite_store::SqliteStore;
