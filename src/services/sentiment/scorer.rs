//! Per-article scoring and near-duplicate removal.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::lexicon::{LexiconAnalyzer, PolarityScorer};
use super::similarity::title_similarity;
use crate::types::{Article, ScoredArticle};

/// Titles at least this similar are treated as the same story.
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

const CREDIBILITY: &[(&str, f64)] = &[
    ("reuters", 1.5),
    ("bloomberg", 1.5),
    ("financial times", 1.4),
    ("ft", 1.4),
    ("wall street journal", 1.4),
    ("wsj", 1.4),
    ("cnbc", 1.3),
    ("kitco", 1.3),
    ("marketwatch", 1.2),
    ("investing.com", 1.2),
    ("bbc", 1.2),
    ("businessline", 1.1),
    ("times of india", 1.1),
    ("economic times", 1.1),
];

/// Domain keywords; each distinct hit adds to relevance.
/// Longer phrases come before the words they contain, so one mention
/// counts once.
const RELEVANCE_KEYWORDS: &[&str] = &[
    "precious metals",
    "precious metal",
    "spot gold",
    "safe haven",
    "central bank",
    "yellow metal",
    "gold",
    "bullion",
    "xau",
    "ounce",
    "inflation",
    "fed",
    "comex",
];
const RELEVANCE_STEP: f64 = 0.2;
const MAX_RELEVANCE: f64 = 2.0;

/// Topic rules in precedence order; the first rule with a hit applies.
/// Terms ending in `*` match any word with that prefix.
const TOPIC_RULES: &[(&[&str], f64)] = &[
    (
        &["price target", "forecast*", "predict*", "could reach", "could hit", "outlook", "expected to"],
        0.6,
    ),
    (
        &["etf inflow*", "etf holdings", "central bank buying", "central banks buy*", "reserves", "accumulat*", "purchases"],
        0.7,
    ),
    (
        &["war", "wars", "sanction*", "tariff*", "geopolit*", "conflict*", "recession", "rate cut*", "rate hike*", "crisis"],
        1.3,
    ),
];

const EQUITY_TERMS: &[&str] = &["shares", "share price", "earnings", "stock", "stocks", "dividend*", "revenue", "eps"];
const EXCHANGE_PREFIXES: &[&str] = &["nyse:", "nasdaq:", "tsx:", "lse:", "asx:"];
const EQUITY_PENALTY: f64 = 0.7;

const RECENCY_HORIZON_HOURS: f64 = 168.0;
const RECENCY_FLOOR: f64 = 0.3;
const RECENCY_UNPARSEABLE: f64 = 0.6;

/// Scores articles with an injected polarity model.
#[derive(Clone)]
pub struct ArticleScorer {
    analyzer: Arc<dyn PolarityScorer>,
}

impl Default for ArticleScorer {
    fn default() -> Self {
        Self::new(Arc::new(LexiconAnalyzer::new()))
    }
}

impl ArticleScorer {
    pub fn new(analyzer: Arc<dyn PolarityScorer>) -> Self {
        Self { analyzer }
    }

    /// Score one article. Articles with a blank title are skipped.
    pub fn score(&self, article: &Article, now: DateTime<Utc>) -> Option<ScoredArticle> {
        let title = article.title.trim();
        if title.is_empty() {
            return None;
        }

        let lower = title.to_lowercase();
        let words = words(&lower);

        let sentiment = self.analyzer.compound(title).clamp(-1.0, 1.0);
        let credibility = credibility(&article.source);
        let relevance = relevance(&words) * topic_multiplier(&lower, &words);
        let recency = recency(&article.published_at, now);
        let equity_penalty = equity_penalty(title, &lower, &words);

        Some(ScoredArticle {
            article: article.clone(),
            sentiment,
            credibility,
            relevance,
            recency,
            equity_penalty,
            final_score: sentiment * credibility * relevance * recency * equity_penalty,
        })
    }

    /// Score every article and drop near-duplicate stories.
    pub fn score_all(&self, articles: &[Article], now: DateTime<Utc>) -> Vec<ScoredArticle> {
        let scored: Vec<ScoredArticle> = articles.iter().filter_map(|a| self.score(a, now)).collect();
        deduplicate(scored)
    }
}

/// Keep the highest-impact article of each story cluster.
///
/// Output is ordered by `|final_score|` descending; ties keep input order.
pub fn deduplicate(mut articles: Vec<ScoredArticle>) -> Vec<ScoredArticle> {
    articles.sort_by(|a, b| b.impact().total_cmp(&a.impact()));

    let mut kept: Vec<ScoredArticle> = Vec::with_capacity(articles.len());
    for article in articles {
        let duplicate = kept
            .iter()
            .any(|k| title_similarity(k.title(), article.title()) >= DUPLICATE_THRESHOLD);
        if !duplicate {
            kept.push(article);
        }
    }
    kept
}

/// Source credibility, 1.0 for unknown sources.
pub fn credibility(source: &str) -> f64 {
    let source = source.trim().to_lowercase();
    let source = source.strip_prefix("the ").unwrap_or(&source);
    CREDIBILITY
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, weight)| *weight)
        .unwrap_or(1.0)
}

fn relevance(words: &[&str]) -> f64 {
    // Hyphenated compounds ("safe-haven") match their spaced form.
    let mut text = format!(" {} ", words.join(" ").replace('-', " "));
    let mut hits = 0;
    for term in RELEVANCE_KEYWORDS {
        let needle = format!(" {} ", term);
        if text.contains(&needle) {
            hits += 1;
            text = text.replace(&needle, " | ");
        }
    }
    (1.0 + RELEVANCE_STEP * hits as f64).min(MAX_RELEVANCE)
}

fn topic_multiplier(lower: &str, words: &[&str]) -> f64 {
    TOPIC_RULES
        .iter()
        .find(|(terms, _)| terms.iter().any(|t| matches_term(lower, words, t)))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

fn equity_penalty(title: &str, lower: &str, words: &[&str]) -> f64 {
    let jargon = EQUITY_TERMS.iter().any(|t| matches_term(lower, words, t));
    let exchange = EXCHANGE_PREFIXES.iter().any(|p| lower.contains(p));
    let cashtag = title.split_whitespace().any(|w| {
        let rest = w.strip_prefix('$').unwrap_or("");
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_uppercase())
    });

    if jargon || exchange || cashtag {
        EQUITY_PENALTY
    } else {
        1.0
    }
}

/// Linear decay from 1.0 to the floor over one week.
pub fn recency(published_at: &str, now: DateTime<Utc>) -> f64 {
    let Some(published) = parse_timestamp(published_at) else {
        return RECENCY_UNPARSEABLE;
    };
    let hours = (now - published).num_seconds() as f64 / 3600.0;
    if hours <= 0.0 {
        return 1.0;
    }
    (1.0 - (1.0 - RECENCY_FLOOR) * hours / RECENCY_HORIZON_HOURS).max(RECENCY_FLOOR)
}

/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS` and compact
/// `YYYYMMDDTHHMMSSZ` timestamps. Naive timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%dT%H%M%SZ"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Lowercase words with punctuation and possessives stripped.
fn words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-' || c == '.'))
        .map(|w| w.trim_matches(|c| c == '\'' || c == '-' || c == '.'))
        .map(|w| w.strip_suffix("'s").unwrap_or(w))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Phrases match as substrings, `stem*` as a word prefix, anything else as a whole word.
fn matches_term(lower: &str, words: &[&str], term: &str) -> bool {
    if let Some(stem) = term.strip_suffix('*') {
        if stem.contains(' ') {
            return lower.contains(stem);
        }
        return words.iter().any(|w| w.starts_with(stem));
    }
    if term.contains(' ') {
        return lower.contains(term);
    }
    words.iter().any(|w| *w == term)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPolarity(f64);

    impl PolarityScorer for FixedPolarity {
        fn compound(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn article(title: &str, source: &str, published_at: &str) -> Article {
        Article {
            title: title.to_string(),
            source: source.to_string(),
            published_at: published_at.to_string(),
            url: None,
        }
    }

    fn fixed_scorer(value: f64) -> ArticleScorer {
        ArticleScorer::new(Arc::new(FixedPolarity(value)))
    }

    #[test]
    fn test_blank_title_is_skipped() {
        let scorer = fixed_scorer(0.8);
        assert!(scorer.score(&article("   ", "reuters", "2024-03-15 12:00:00"), now()).is_none());
    }

    #[test]
    fn test_final_score_is_product_of_multipliers() {
        let scorer = fixed_scorer(0.5);
        let scored = scorer
            .score(&article("Gold bullion demand steady", "Reuters", "2024-03-15 12:00:00"), now())
            .unwrap();
        assert_eq!(scored.credibility, 1.5);
        assert!((scored.relevance - 1.4).abs() < 1e-12);
        assert_eq!(scored.recency, 1.0);
        assert_eq!(scored.equity_penalty, 1.0);
        assert!((scored.final_score - 0.5 * 1.5 * 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_credibility_table() {
        assert_eq!(credibility("REUTERS"), 1.5);
        assert_eq!(credibility("kitco"), 1.3);
        assert_eq!(credibility("Times of India"), 1.1);
        assert_eq!(credibility("The Times of India"), 1.1);
        assert_eq!(credibility("  The Economic Times "), 1.1);
        assert_eq!(credibility("some blog"), 1.0);
    }

    #[test]
    fn test_relevance_is_capped() {
        let lower = "gold bullion xau ounce comex inflation fed central bank spot gold";
        assert_eq!(relevance(&words(lower)), MAX_RELEVANCE);
        assert_eq!(relevance(&words("weather report")), 1.0);
    }

    #[test]
    fn test_relevance_counts_each_mention_once() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(relevance(&words("precious metals rally")), 1.2));
        assert!(close(relevance(&words("spot gold edges up")), 1.2));
        assert!(close(relevance(&words("safe-haven demand lifts bullion")), 1.4));
        assert!(close(relevance(&words("gold and silver: precious metal outlook")), 1.4));
    }

    #[test]
    fn test_topic_precedence() {
        // Forecast language wins over macro language.
        let lower = "analysts forecast gold at $3000 amid war fears";
        assert_eq!(topic_multiplier(lower, &words(lower)), 0.6);
        let lower = "central bank buying lifts gold reserves";
        assert_eq!(topic_multiplier(lower, &words(lower)), 0.7);
        let lower = "gold jumps as new tariffs spark trade conflict";
        assert_eq!(topic_multiplier(lower, &words(lower)), 1.3);
        let lower = "gold edges higher";
        assert_eq!(topic_multiplier(lower, &words(lower)), 1.0);
    }

    #[test]
    fn test_topic_terms_match_whole_words() {
        let lower = "gold steady as software stocks rally";
        assert_eq!(topic_multiplier(lower, &words(lower)), 1.0);
    }

    #[test]
    fn test_equity_penalty() {
        let check = |title: &str| {
            let lower = title.to_lowercase();
            equity_penalty(title, &lower, &words(&lower))
        };
        assert_eq!(check("Newmont shares rise after earnings beat"), 0.7);
        assert_eq!(check("Miner NYSE:NEM jumps"), 0.7);
        assert_eq!(check("$GOLD climbs"), 0.7);
        assert_eq!(check("Gold costs $2,300 an ounce"), 1.0);
        assert_eq!(check("Gold climbs on weak dollar"), 1.0);
    }

    #[test]
    fn test_recency_decay() {
        assert_eq!(recency("2024-03-15 12:00:00", now()), 1.0);
        assert_eq!(recency("2024-03-16T12:00:00Z", now()), 1.0);
        let half = recency("2024-03-11T12:00:00+00:00", now());
        assert!((half - (1.0 - 0.7 * 96.0 / 168.0)).abs() < 1e-12);
        assert_eq!(recency("2024-03-08 00:00:00", now()), RECENCY_FLOOR);
        assert_eq!(recency("2024-01-01 00:00:00", now()), RECENCY_FLOOR);
        assert_eq!(recency("yesterday-ish", now()), RECENCY_UNPARSEABLE);
        assert_eq!(recency("", now()), RECENCY_UNPARSEABLE);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-14 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("20240314T093000Z"), Some(expected));
        assert_eq!(parse_timestamp("Thu, 14 Mar 2024 09:30:00 +0000"), Some(expected));
    }

    #[test]
    fn test_duplicate_titles_keep_most_credible() {
        let scorer = fixed_scorer(0.8);
        let title = "Gold climbs as investors seek safety";
        let articles = vec![
            article(title, "blog one", "2024-03-15 10:00:00"),
            article(title, "blog two", "2024-03-15 10:00:00"),
            article(title, "Reuters", "2024-03-15 10:00:00"),
            article(title, "blog three", "2024-03-15 10:00:00"),
            article(title, "blog four", "2024-03-15 10:00:00"),
        ];
        let kept = scorer.score_all(&articles, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].article.source, "Reuters");
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let scorer = ArticleScorer::default();
        let articles = vec![
            article("Gold surges to record high", "reuters", "2024-03-15 10:00:00"),
            article("Gold surges to a record high", "cnbc", "2024-03-15 09:00:00"),
            article("Gold slips as dollar firms", "kitco", "2024-03-14 10:00:00"),
            article("Silver miners report weak output", "bbc", "2024-03-13 10:00:00"),
            article("Central bank buying supports bullion", "ft", "2024-03-12 10:00:00"),
        ];
        let once = scorer.score_all(&articles, now());
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
        assert!(once.len() < articles.len());
        assert!(once.windows(2).all(|w| w[0].impact() >= w[1].impact()));
    }
}
