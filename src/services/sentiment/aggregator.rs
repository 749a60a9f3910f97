//! Weekly aggregation of scored articles into a sentiment reading.

use chrono::NaiveDate;

use crate::types::{ScoredArticle, SentimentHistory, SentimentResult, SignalAction, WeeklyAggregate};

/// Volume increase (percent) that counts as a news spike.
const VOLUME_SPIKE_PCT: f64 = 20.0;
const DIRECTION_TOP_N: usize = 5;
const CONFIDENCE_TOP_N: usize = 10;
/// Fewer articles than this report zero dispersion.
const MIN_ARTICLES_FOR_STD: usize = 3;

/// Prior weekly averages needed before switching to z-score thresholds.
const MIN_HISTORY_FOR_ZSCORE: usize = 4;
const ZSCORE_THRESHOLD: f64 = 0.5;
const ABSOLUTE_THRESHOLD: f64 = 0.2;
const ZSCORE_EPSILON: f64 = 1e-6;

/// Result of one aggregation plus the history to persist for the next run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub result: SentimentResult,
    /// This week's aggregate, to be upserted by the caller.
    pub weekly: WeeklyAggregate,
    pub history: SentimentHistory,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAggregator;

impl SentimentAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate deduplicated articles for the week starting `week_start`.
    ///
    /// `this_week_count` is the number of articles fetched for the week,
    /// before deduplication. History entries for `week_start` itself are
    /// ignored and replaced in the returned history.
    pub fn aggregate(
        &self,
        mut articles: Vec<ScoredArticle>,
        this_week_count: u32,
        history: &SentimentHistory,
        week_start: NaiveDate,
    ) -> Aggregation {
        let prior: Vec<&WeeklyAggregate> = history.prior_to(week_start).collect();

        let avg_weekly_count = if prior.is_empty() {
            this_week_count as f64
        } else {
            prior.iter().map(|w| w.total_articles as f64).sum::<f64>() / prior.len() as f64
        };
        let volume_increase_pct = if avg_weekly_count == 0.0 {
            0.0
        } else {
            (this_week_count as f64 - avg_weekly_count) / avg_weekly_count * 100.0
        };
        let volume_flag = volume_increase_pct >= VOLUME_SPIKE_PCT;

        articles.sort_by(|a, b| b.impact().total_cmp(&a.impact()));
        let top_scores: Vec<f64> = articles
            .iter()
            .take(CONFIDENCE_TOP_N)
            .map(|a| a.final_score)
            .collect();

        let avg_sentiment = mean(&top_scores[..top_scores.len().min(DIRECTION_TOP_N)]);
        let confidence_sentiment = mean(&top_scores);
        let sentiment_std = if top_scores.len() >= MIN_ARTICLES_FOR_STD {
            population_std(&top_scores)
        } else {
            0.0
        };

        let past_sentiments: Vec<f64> = prior.iter().map(|w| w.average_sentiment).collect();
        let signal = if articles.is_empty() {
            SignalAction::Hold
        } else {
            sentiment_signal(avg_sentiment, &past_sentiments)
        };
        let confidence = (confidence_sentiment.abs() * 100.0).min(100.0);

        let weekly = WeeklyAggregate {
            week_start,
            total_articles: this_week_count,
            average_sentiment: avg_sentiment,
        };
        let mut updated = history.clone();
        updated.upsert(weekly.clone());

        Aggregation {
            result: SentimentResult {
                avg_sentiment,
                confidence_sentiment,
                sentiment_std,
                volume_flag,
                this_week_count,
                avg_weekly_count,
                volume_increase_pct,
                signal,
                confidence,
                articles,
            },
            weekly,
            history: updated,
        }
    }
}

/// Z-score against past weekly averages when there is enough history,
/// absolute thresholds otherwise.
///
/// Unlike z-scoring from the first stored week, this path waits for
/// `MIN_HISTORY_FOR_ZSCORE` prior weeks. A single prior week has zero
/// spread and turns any change into an extreme z-score.
fn sentiment_signal(avg_sentiment: f64, past: &[f64]) -> SignalAction {
    if past.len() >= MIN_HISTORY_FOR_ZSCORE {
        let z = (avg_sentiment - mean(past)) / (population_std(past) + ZSCORE_EPSILON);
        threshold_signal(z, ZSCORE_THRESHOLD)
    } else {
        threshold_signal(avg_sentiment, ABSOLUTE_THRESHOLD)
    }
}

/// Strict thresholds: a value exactly on the boundary holds.
fn threshold_signal(value: f64, threshold: f64) -> SignalAction {
    if value > threshold {
        SignalAction::Buy
    } else if value < -threshold {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;

    fn week(d: &str, total: u32, avg: f64) -> WeeklyAggregate {
        WeeklyAggregate {
            week_start: d.parse().unwrap(),
            total_articles: total,
            average_sentiment: avg,
        }
    }

    fn scored(title: &str, final_score: f64) -> ScoredArticle {
        ScoredArticle {
            article: Article {
                title: title.to_string(),
                source: "reuters".to_string(),
                published_at: "2024-03-15 10:00:00".to_string(),
                url: None,
            },
            sentiment: final_score,
            credibility: 1.0,
            relevance: 1.0,
            recency: 1.0,
            equity_penalty: 1.0,
            final_score,
        }
    }

    fn current_week() -> NaiveDate {
        "2024-03-11".parse().unwrap()
    }

    #[test]
    fn test_no_history_uses_this_week_as_baseline() {
        let articles: Vec<ScoredArticle> = (0..12).map(|i| scored(&format!("story {}", i), 0.1)).collect();
        let agg = SentimentAggregator::new().aggregate(articles, 12, &SentimentHistory::default(), current_week());
        assert_eq!(agg.result.avg_weekly_count, 12.0);
        assert_eq!(agg.result.volume_increase_pct, 0.0);
        assert!(!agg.result.volume_flag);
    }

    #[test]
    fn test_zero_baseline_does_not_divide() {
        let history = SentimentHistory::new(vec![week("2024-03-04", 0, 0.0)]);
        let agg = SentimentAggregator::new().aggregate(Vec::new(), 5, &history, current_week());
        assert_eq!(agg.result.avg_weekly_count, 0.0);
        assert_eq!(agg.result.volume_increase_pct, 0.0);
        assert!(!agg.result.volume_flag);
    }

    #[test]
    fn test_volume_spike_at_twenty_percent() {
        let history = SentimentHistory::new(vec![week("2024-02-26", 10, 0.0), week("2024-03-04", 10, 0.0)]);
        let agg = SentimentAggregator::new().aggregate(Vec::new(), 12, &history, current_week());
        assert!((agg.result.volume_increase_pct - 20.0).abs() < 1e-9);
        assert!(agg.result.volume_flag);

        let agg = SentimentAggregator::new().aggregate(Vec::new(), 11, &history, current_week());
        assert!(!agg.result.volume_flag);
    }

    #[test]
    fn test_current_week_excluded_from_baseline() {
        let history = SentimentHistory::new(vec![week("2024-03-04", 10, 0.0), week("2024-03-11", 100, 0.9)]);
        let agg = SentimentAggregator::new().aggregate(Vec::new(), 10, &history, current_week());
        assert_eq!(agg.result.avg_weekly_count, 10.0);
        // Stale entry for this week is replaced.
        assert_eq!(agg.history.len(), 2);
        assert_eq!(agg.history.get(current_week()).unwrap().total_articles, 10);
    }

    #[test]
    fn test_top_five_direction_and_top_ten_confidence() {
        let mut articles: Vec<ScoredArticle> =
            (0..5).map(|i| scored(&format!("big {}", i), 0.5)).collect();
        articles.extend((0..5).map(|i| scored(&format!("small {}", i), -0.1)));
        articles.extend((0..3).map(|i| scored(&format!("tiny {}", i), 0.01)));

        let agg = SentimentAggregator::new().aggregate(articles, 13, &SentimentHistory::default(), current_week());
        assert!((agg.result.avg_sentiment - 0.5).abs() < 1e-12);
        assert!((agg.result.confidence_sentiment - 0.2).abs() < 1e-12);
        assert!((agg.result.sentiment_std - 0.3).abs() < 1e-12);
        assert_eq!(agg.result.signal, SignalAction::Buy);
        assert!((agg.result.confidence - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_std_needs_three_articles() {
        let articles = vec![scored("a", 0.9), scored("b", -0.9)];
        let agg = SentimentAggregator::new().aggregate(articles, 2, &SentimentHistory::default(), current_week());
        assert_eq!(agg.result.sentiment_std, 0.0);
    }

    #[test]
    fn test_no_articles_holds() {
        let agg = SentimentAggregator::new().aggregate(Vec::new(), 0, &SentimentHistory::default(), current_week());
        assert_eq!(agg.result.signal, SignalAction::Hold);
        assert_eq!(agg.result.avg_sentiment, 0.0);
        assert_eq!(agg.result.confidence, 0.0);
        assert_eq!(agg.weekly.total_articles, 0);
    }

    #[test]
    fn test_zscore_against_history() {
        let history = SentimentHistory::new(vec![
            week("2024-02-12", 10, 0.30),
            week("2024-02-19", 10, 0.32),
            week("2024-02-26", 10, 0.28),
            week("2024-03-04", 10, 0.30),
        ]);
        // 0.25 is bullish in absolute terms but well below the recent norm.
        let agg = SentimentAggregator::new().aggregate(vec![scored("x", 0.25)], 10, &history, current_week());
        assert_eq!(agg.result.signal, SignalAction::Sell);
    }

    #[test]
    fn test_short_history_uses_absolute_thresholds() {
        let history = SentimentHistory::new(vec![week("2024-03-04", 10, 0.9)]);
        let agg = SentimentAggregator::new().aggregate(vec![scored("x", 0.25)], 10, &history, current_week());
        assert_eq!(agg.result.signal, SignalAction::Buy);
        let agg = SentimentAggregator::new().aggregate(vec![scored("x", 0.2)], 10, &history, current_week());
        assert_eq!(agg.result.signal, SignalAction::Hold);
    }

    #[test]
    fn test_history_is_returned_not_mutated() {
        let history = SentimentHistory::new(vec![week("2024-03-04", 10, 0.1)]);
        let agg = SentimentAggregator::new().aggregate(vec![scored("x", 0.4)], 3, &history, current_week());
        assert_eq!(history.len(), 1);
        assert_eq!(agg.history.len(), 2);
        assert_eq!(agg.weekly.average_sentiment, agg.result.avg_sentiment);
    }
}
