//! Aurum - gold signal service fusing technical indicators with news sentiment

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::{ArticleScorer, SignalPipeline, SqliteStore};
use sources::{NewsDataClient, YahooFinanceClient};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub yahoo: Arc<YahooFinanceClient>,
    pub news: Arc<NewsDataClient>,
    pub pipeline: Arc<SignalPipeline>,
}

impl AppState {
    /// Build the collaborators described by `config` around an opened store.
    pub fn new(config: Config, store: SqliteStore) -> error::Result<Self> {
        let yahoo = YahooFinanceClient::new(config.http_timeout_secs)?;
        let news = NewsDataClient::new(
            config.newsdata_api_key.clone(),
            config.news_query.clone(),
            config.http_timeout_secs,
        )?;
        let pipeline = SignalPipeline::new(config.indicators.clone(), ArticleScorer::default());

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            yahoo: Arc::new(yahoo),
            news: Arc::new(news),
            pipeline: Arc::new(pipeline),
        })
    }
}

// Re-export commonly used types
pub use types::*;
