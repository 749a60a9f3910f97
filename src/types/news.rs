use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw news item as returned by a news source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    /// Publish timestamp exactly as the source reported it.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Article plus the multipliers the scorer derived for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    /// Compound polarity of the title in [-1, 1].
    pub sentiment: f64,
    pub credibility: f64,
    /// Keyword relevance already adjusted by the topic multiplier.
    pub relevance: f64,
    pub recency: f64,
    pub equity_penalty: f64,
    pub final_score: f64,
}

impl ScoredArticle {
    pub fn title(&self) -> &str {
        &self.article.title
    }

    /// Impact used for ranking, independent of direction.
    pub fn impact(&self) -> f64 {
        self.final_score.abs()
    }
}

/// News volume and sentiment for one calendar week (keyed by its Monday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    pub week_start: NaiveDate,
    pub total_articles: u32,
    pub average_sentiment: f64,
}

/// Weekly aggregates carried between invocations.
///
/// Loaded by the caller before a run and persisted after it; the aggregator
/// returns an updated copy rather than mutating shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentHistory {
    weeks: Vec<WeeklyAggregate>,
}

impl SentimentHistory {
    /// Build a history, keeping the last entry for any repeated week and
    /// ordering by week ascending.
    pub fn new(weeks: Vec<WeeklyAggregate>) -> Self {
        let mut history = Self::default();
        for week in weeks {
            history.upsert(week);
        }
        history
    }

    pub fn weeks(&self) -> &[WeeklyAggregate] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Insert or replace the aggregate for its week.
    pub fn upsert(&mut self, week: WeeklyAggregate) {
        match self
            .weeks
            .binary_search_by(|w| w.week_start.cmp(&week.week_start))
        {
            Ok(idx) => self.weeks[idx] = week,
            Err(idx) => self.weeks.insert(idx, week),
        }
    }

    /// Weeks strictly before `week_start`.
    pub fn prior_to(&self, week_start: NaiveDate) -> impl Iterator<Item = &WeeklyAggregate> {
        self.weeks.iter().filter(move |w| w.week_start < week_start)
    }

    pub fn get(&self, week_start: NaiveDate) -> Option<&WeeklyAggregate> {
        self.weeks.iter().find(|w| w.week_start == week_start)
    }
}
