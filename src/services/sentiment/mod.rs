//! News sentiment: headline polarity, per-article weighting, near-duplicate
//! removal and weekly aggregation.

pub mod aggregator;
pub mod lexicon;
pub mod scorer;
pub mod similarity;

pub use aggregator::{Aggregation, SentimentAggregator};
pub use lexicon::{LexiconAnalyzer, PolarityScorer};
pub use scorer::{deduplicate, ArticleScorer};
pub use similarity::{similarity_ratio, title_similarity};
