//! SQLite persistence for price history, scored news, weekly sentiment
//! aggregates and the signal history.
//!
//! All access goes through one mutex-guarded connection, so writes from
//! concurrent requests are serialized. Weekly aggregates are upserted by
//! `week_start`; news and signal history are append-only.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::services::pipeline::AnalysisOutcome;
use crate::types::{
    PricePoint, Regime, ScoredArticle, SentimentHistory, SignalAction, SignalRecord,
    WeeklyAggregate,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite store for the analysis history.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("SQLite connection lock poisoned".to_string()))
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS gold_prices (
                date TEXT PRIMARY KEY,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                ma10 REAL,
                ma20 REAL,
                ma50 REAL,
                ma200 REAL,
                ema10 REAL,
                rsi REAL,
                atr REAL
            );

            CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                source TEXT NOT NULL,
                published_at TEXT NOT NULL,
                sentiment REAL NOT NULL,
                final_score REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS news_volume (
                week_start TEXT PRIMARY KEY,
                total_articles INTEGER NOT NULL,
                average_sentiment REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS signal_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                price REAL NOT NULL,
                technical_signal TEXT NOT NULL,
                technical_confidence REAL NOT NULL,
                sentiment_signal TEXT NOT NULL,
                sentiment_confidence REAL NOT NULL,
                combined_signal TEXT NOT NULL,
                combined_confidence REAL NOT NULL,
                regime TEXT NOT NULL,
                explanation TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_signal_history_date ON signal_history(date DESC);",
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    /// Round-trip a trivial query to confirm the database is usable.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    // ========== Prices ==========

    /// Upsert enriched price points by date.
    pub fn save_price_points(&self, points: &[PricePoint]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let saved = insert_price_points(&tx, points)?;
        tx.commit()?;
        debug!("Saved {} price points", saved);
        Ok(saved)
    }

    pub fn price_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM gold_prices", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== News ==========

    /// Append scored articles.
    pub fn save_articles(&self, articles: &[ScoredArticle]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let saved = insert_articles(&tx, articles)?;
        tx.commit()?;
        debug!("Saved {} articles", saved);
        Ok(saved)
    }

    pub fn news_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Weekly aggregates ==========

    /// Insert or replace the aggregate for its week.
    pub fn upsert_weekly(&self, weekly: &WeeklyAggregate) -> Result<()> {
        let conn = self.conn()?;
        upsert_weekly_row(&conn, weekly)
    }

    /// All weekly aggregates, oldest week first.
    pub fn load_history(&self) -> Result<SentimentHistory> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT week_start, total_articles, average_sentiment
             FROM news_volume ORDER BY week_start ASC",
        )?;
        let weeks = stmt
            .query_map([], |row| {
                Ok(WeeklyAggregate {
                    week_start: parse_date(row, 0)?,
                    total_articles: row.get(1)?,
                    average_sentiment: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(SentimentHistory::new(weeks))
    }

    // ========== Signal history ==========

    /// Append a signal record, returning its row id.
    pub fn append_signal(&self, record: &SignalRecord) -> Result<i64> {
        let conn = self.conn()?;
        insert_signal(&conn, record)
    }

    /// Most recent signal records, newest first.
    pub fn recent_signals(&self, limit: usize) -> Result<Vec<SignalRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, price, technical_signal, technical_confidence,
                    sentiment_signal, sentiment_confidence, combined_signal,
                    combined_confidence, regime, explanation
             FROM signal_history
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(SignalRecord {
                    id: Some(row.get(0)?),
                    date: parse_date(row, 1)?,
                    price: row.get(2)?,
                    technical_signal: parse_action(row, 3)?,
                    technical_confidence: row.get(4)?,
                    sentiment_signal: parse_action(row, 5)?,
                    sentiment_confidence: row.get(6)?,
                    combined_signal: parse_action(row, 7)?,
                    combined_confidence: row.get(8)?,
                    regime: parse_regime(row, 9)?,
                    explanation: row.get(10)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    // ========== Analysis outcomes ==========

    /// Persist everything one analysis run produced in a single
    /// transaction, returning the id of the appended signal record.
    pub fn record_outcome(&self, outcome: &AnalysisOutcome) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let prices = insert_price_points(&tx, &outcome.points)?;
        let articles = insert_articles(&tx, &outcome.report.sentiment_articles)?;
        upsert_weekly_row(&tx, &outcome.weekly)?;
        let id = insert_signal(&tx, &outcome.record)?;
        tx.commit()?;
        debug!(
            "Persisted {} price points, {} articles and signal #{}",
            prices, articles, id
        );
        Ok(id)
    }
}

fn insert_price_points(conn: &Connection, points: &[PricePoint]) -> Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO gold_prices (
            date, open, high, low, close, volume,
            ma10, ma20, ma50, ma200, ema10, rsi, atr
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for p in points {
        stmt.execute(params![
            p.bar.date.format(DATE_FORMAT).to_string(),
            p.bar.open,
            p.bar.high,
            p.bar.low,
            p.bar.close,
            p.bar.volume,
            p.ma(10),
            p.ma(20),
            p.ma(50),
            p.ma(200),
            p.ema,
            p.rsi,
            p.volatility,
        ])?;
    }
    Ok(points.len())
}

fn insert_articles(conn: &Connection, articles: &[ScoredArticle]) -> Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO news (title, source, published_at, sentiment, final_score)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for a in articles {
        stmt.execute(params![
            a.article.title,
            a.article.source,
            a.article.published_at,
            a.sentiment,
            a.final_score,
        ])?;
    }
    Ok(articles.len())
}

fn upsert_weekly_row(conn: &Connection, weekly: &WeeklyAggregate) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO news_volume (week_start, total_articles, average_sentiment)
         VALUES (?1, ?2, ?3)",
        params![
            weekly.week_start.format(DATE_FORMAT).to_string(),
            weekly.total_articles,
            weekly.average_sentiment,
        ],
    )?;
    Ok(())
}

fn insert_signal(conn: &Connection, record: &SignalRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO signal_history (
            date, price, technical_signal, technical_confidence,
            sentiment_signal, sentiment_confidence, combined_signal,
            combined_confidence, regime, explanation
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.date.format(DATE_FORMAT).to_string(),
            record.price,
            record.technical_signal.as_str(),
            record.technical_confidence,
            record.sentiment_signal.as_str(),
            record.sentiment_confidence,
            record.combined_signal.as_str(),
            record.combined_confidence,
            record.regime.as_str(),
            record.explanation,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn invalid_text(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| invalid_text(idx, format!("bad date {:?}: {}", raw, e)))
}

fn parse_action(row: &Row<'_>, idx: usize) -> rusqlite::Result<SignalAction> {
    let raw: String = row.get(idx)?;
    SignalAction::from_str(&raw).ok_or_else(|| invalid_text(idx, format!("bad signal {:?}", raw)))
}

fn parse_regime(row: &Row<'_>, idx: usize) -> rusqlite::Result<Regime> {
    let raw: String = row.get(idx)?;
    Regime::from_str(&raw).ok_or_else(|| invalid_text(idx, format!("bad regime {:?}", raw)))
}
