//! Unit tests for types module

use aurum::types::*;
use chrono::NaiveDate;
use serde_json::json;

fn week(date: &str, total: u32, avg: f64) -> WeeklyAggregate {
    WeeklyAggregate {
        week_start: date.parse().unwrap(),
        total_articles: total,
        average_sentiment: avg,
    }
}

#[test]
fn test_article_wire_format() {
    let article: Article = serde_json::from_value(json!({
        "title": "Gold edges higher",
        "source": "cnbc",
        "publishedAt": "2024-03-14T06:00:00Z"
    }))
    .unwrap();
    assert_eq!(article.published_at, "2024-03-14T06:00:00Z");
    assert!(article.url.is_none());

    let value = serde_json::to_value(&article).unwrap();
    assert!(value.get("url").is_none());
    assert_eq!(value["publishedAt"], "2024-03-14T06:00:00Z");
}

#[test]
fn test_scored_article_flattens_article() {
    let scored = ScoredArticle {
        article: Article {
            title: "Gold slides".to_string(),
            source: "bbc".to_string(),
            published_at: "2024-03-14".to_string(),
            url: None,
        },
        sentiment: -0.4,
        credibility: 1.2,
        relevance: 1.2,
        recency: 1.0,
        equity_penalty: 1.0,
        final_score: -0.576,
    };
    let value = serde_json::to_value(&scored).unwrap();
    assert_eq!(value["title"], "Gold slides");
    assert_eq!(value["final_score"], -0.576);
    assert_eq!(scored.impact(), 0.576);
}

#[test]
fn test_sentiment_history_orders_and_replaces() {
    let mut history = SentimentHistory::new(vec![
        week("2024-03-11", 9, 0.2),
        week("2024-02-26", 4, 0.1),
        week("2024-03-04", 6, -0.1),
    ]);
    let order: Vec<String> = history.weeks().iter().map(|w| w.week_start.to_string()).collect();
    assert_eq!(order, vec!["2024-02-26", "2024-03-04", "2024-03-11"]);

    history.upsert(week("2024-03-11", 12, 0.3));
    assert_eq!(history.len(), 3);
    let current = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    assert_eq!(history.get(current).map(|w| w.total_articles), Some(12));
    assert_eq!(history.prior_to(current).count(), 2);
}

#[test]
fn test_signal_record_serialization() {
    let record = SignalRecord {
        id: None,
        date: "2024-03-14".parse().unwrap(),
        price: 2160.0,
        technical_signal: SignalAction::Buy,
        technical_confidence: 70.0,
        sentiment_signal: SignalAction::Hold,
        sentiment_confidence: 10.0,
        combined_signal: SignalAction::Buy,
        combined_confidence: 52.0,
        regime: Regime::Trending,
        explanation: "Market is in a trending regime; momentum dominates.".to_string(),
    };
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("id").is_none());
    assert_eq!(value["date"], "2024-03-14");
    assert_eq!(value["technical_signal"], "BUY");
    assert_eq!(value["regime"], "TRENDING");

    let parsed: SignalRecord = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn test_candle_pattern_keys_match_serde() {
    for pattern in [
        CandlePattern::BullishEngulfing,
        CandlePattern::BearishEngulfing,
        CandlePattern::BullishPinBar,
        CandlePattern::BearishPinBar,
        CandlePattern::BreakoutUp,
        CandlePattern::BreakoutDown,
    ] {
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, format!("\"{}\"", pattern.key()));
    }
    assert_eq!(CandlePattern::BullishPinBar.direction(), 1);
    assert_eq!(CandlePattern::BreakoutDown.direction(), -1);
}

#[test]
fn test_indicator_snapshot_missing_values_are_neutral() {
    let snapshot = IndicatorSnapshot::default();
    assert!(snapshot.ma(200).is_none());
    assert_eq!(snapshot.structure_flag(90), 0);
}
