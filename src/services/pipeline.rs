//! Batch analysis pass: prices and news in, one fused decision out.
//!
//! The pipeline is synchronous and touches no I/O. Callers fetch the
//! inputs, run it, then persist the pieces of the returned outcome.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::config::IndicatorConfig;
use crate::error::{AppError, Result};
use crate::services::sentiment::{ArticleScorer, SentimentAggregator};
use crate::services::signals::{
    blended_confidence, detect_patterns, FusionEngine, IndicatorEngine, TechnicalSignalGenerator,
};
use crate::types::{
    AnalysisReport, Article, PriceBar, PricePoint, SentimentHistory, SignalRecord, WeeklyAggregate,
};

/// Inputs for one invocation.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    /// Daily bars, oldest first.
    pub bars: Vec<PriceBar>,
    /// Articles fetched for the current week.
    pub articles: Vec<Article>,
    pub weekly_history: SentimentHistory,
    pub now: DateTime<Utc>,
}

/// Everything an invocation produces, including what the caller persists.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub points: Vec<PricePoint>,
    /// Aggregate to upsert for the current week.
    pub weekly: WeeklyAggregate,
    pub history: SentimentHistory,
    /// Row to append to signal history.
    pub record: SignalRecord,
}

/// Wires the indicator engine, article scorer, sentiment aggregator,
/// technical generator and fusion engine together.
#[derive(Clone)]
pub struct SignalPipeline {
    indicators: IndicatorEngine,
    technical: TechnicalSignalGenerator,
    scorer: ArticleScorer,
    aggregator: SentimentAggregator,
    fusion: FusionEngine,
}

impl Default for SignalPipeline {
    fn default() -> Self {
        Self::new(IndicatorConfig::default(), ArticleScorer::default())
    }
}

impl SignalPipeline {
    pub fn new(config: IndicatorConfig, scorer: ArticleScorer) -> Self {
        Self {
            technical: TechnicalSignalGenerator::new(&config),
            indicators: IndicatorEngine::new(config),
            scorer,
            aggregator: SentimentAggregator::new(),
            fusion: FusionEngine::new(),
        }
    }

    pub fn run(&self, input: AnalysisInput) -> Result<AnalysisOutcome> {
        let AnalysisInput {
            bars,
            articles,
            weekly_history,
            now,
        } = input;

        if bars.is_empty() {
            return Err(AppError::InputUnavailable("price series is empty".to_string()));
        }

        let points = self.indicators.compute(&bars);
        let snapshot = self
            .indicators
            .snapshot(&points)
            .ok_or_else(|| AppError::InputUnavailable("price series is empty".to_string()))?;
        let latest_price = snapshot.close;

        let week_start = week_start(now);
        let this_week_count = u32::try_from(articles.len()).unwrap_or(u32::MAX);
        let scored = self.scorer.score_all(&articles, now);
        debug!(
            "Scored {} articles, {} after deduplication",
            articles.len(),
            scored.len()
        );

        let aggregation = self
            .aggregator
            .aggregate(scored, this_week_count, &weekly_history, week_start);
        let sentiment = aggregation.result;
        debug!(
            "Sentiment: avg={:.3} std={:.3} signal={} volume_change={:.1}%",
            sentiment.avg_sentiment,
            sentiment.sentiment_std,
            sentiment.signal,
            sentiment.volume_increase_pct
        );

        let technical = self.technical.generate(&snapshot, sentiment.volume_flag);
        debug!(
            "Technical: signal={} score={:.3} confidence={:.1}",
            technical.signal, technical.score, technical.confidence
        );

        let combined_signal = self
            .fusion
            .fuse(&technical, sentiment.signal, sentiment.avg_sentiment);
        let combined_confidence = blended_confidence(technical.confidence, sentiment.confidence);
        debug!(
            "Combined: signal={} score={:.2} confidence={:.1} regime={}",
            combined_signal.signal,
            combined_signal.score,
            combined_signal.confidence,
            combined_signal.regime.as_str()
        );

        let patterns = detect_patterns(&bars)
            .into_iter()
            .map(|p| (p.key().to_string(), p.direction()))
            .collect();

        let record = SignalRecord {
            id: None,
            date: now.date_naive(),
            price: latest_price,
            technical_signal: technical.signal,
            technical_confidence: technical.confidence,
            sentiment_signal: sentiment.signal,
            sentiment_confidence: sentiment.confidence,
            combined_signal: combined_signal.signal,
            combined_confidence,
            regime: combined_signal.regime,
            explanation: combined_signal.explanation.clone(),
        };

        let report = AnalysisReport {
            week_start,
            this_week_articles: sentiment.this_week_count,
            average_weekly_articles: sentiment.avg_weekly_count,
            volume_increase_percent: sentiment.volume_increase_pct,
            news_volume_spike: sentiment.volume_flag,
            latest_price,
            technical,
            sentiment_signal: sentiment.signal,
            sentiment_confidence: sentiment.confidence,
            avg_sentiment: sentiment.avg_sentiment,
            sentiment_std: sentiment.sentiment_std,
            combined_signal,
            combined_confidence,
            patterns,
            sentiment_articles: sentiment.articles,
        };

        Ok(AnalysisOutcome {
            report,
            points,
            weekly: aggregation.weekly,
            history: aggregation.history,
            record,
        })
    }
}

/// Monday (UTC) of the week containing `now`.
pub fn week_start(now: DateTime<Utc>) -> NaiveDate {
    let date = now.date_naive();
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_bars(count: usize, step: f64) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        (0..count)
            .map(|i| {
                let close = 1900.0 + i as f64 * step;
                PriceBar {
                    date: start + chrono::Days::new(i as u64),
                    open: close,
                    high: close + 2.0,
                    low: close - 2.0,
                    close,
                    volume: 0.0,
                }
            })
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start(now()).to_string(), "2024-03-11");
        let monday = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert_eq!(week_start(monday).to_string(), "2024-03-11");
        let sunday = Utc.with_ymd_and_hms(2024, 3, 17, 23, 59, 59).unwrap();
        assert_eq!(week_start(sunday).to_string(), "2024-03-11");
    }

    #[test]
    fn test_empty_price_series_is_fatal() {
        let input = AnalysisInput {
            bars: Vec::new(),
            articles: Vec::new(),
            weekly_history: SentimentHistory::default(),
            now: now(),
        };
        let err = SignalPipeline::default().run(input).unwrap_err();
        assert!(matches!(err, AppError::InputUnavailable(_)));
    }

    #[test]
    fn test_single_bar_degrades_gracefully() {
        let input = AnalysisInput {
            bars: create_bars(1, 0.0),
            articles: Vec::new(),
            weekly_history: SentimentHistory::default(),
            now: now(),
        };
        let outcome = SignalPipeline::default().run(input).unwrap();
        assert_eq!(outcome.report.technical.signal, crate::types::SignalAction::Hold);
        assert_eq!(outcome.report.combined_signal.signal, crate::types::SignalAction::Hold);
        assert_eq!(outcome.points.len(), 1);
        assert!(outcome.report.patterns.is_empty());
    }

    #[test]
    fn test_outcome_carries_persistence_requests() {
        let input = AnalysisInput {
            bars: create_bars(260, 1.0),
            articles: vec![Article {
                title: "Gold rallies to record high".to_string(),
                source: "reuters".to_string(),
                published_at: "2024-03-14 06:00:00".to_string(),
                url: None,
            }],
            weekly_history: SentimentHistory::default(),
            now: now(),
        };
        let outcome = SignalPipeline::default().run(input).unwrap();
        assert_eq!(outcome.weekly.week_start.to_string(), "2024-03-11");
        assert_eq!(outcome.weekly.total_articles, 1);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.record.date.to_string(), "2024-03-14");
        assert_eq!(outcome.record.price, outcome.report.latest_price);
        assert_eq!(outcome.record.explanation, outcome.report.combined_signal.explanation);
        assert_eq!(outcome.report.sentiment_articles.len(), 1);
    }
}
