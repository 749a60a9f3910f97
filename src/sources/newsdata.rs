//! NewsData.io client for recent headlines.
//!
//! News is optional: every failure is logged and yields no articles so an
//! analysis can still run on prices alone.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::Article;

const NEWS_URL: &str = "https://newsdata.io/api/1/news";

#[derive(Debug, Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<NewsDataArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsDataArticle {
    title: Option<String>,
    source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    link: Option<String>,
}

impl From<NewsDataArticle> for Article {
    fn from(a: NewsDataArticle) -> Self {
        Article {
            title: a.title.unwrap_or_default(),
            source: a.source_id.unwrap_or_else(|| "Unknown".to_string()),
            published_at: a.pub_date.unwrap_or_default(),
            url: a.link,
        }
    }
}

/// NewsData.io API client.
pub struct NewsDataClient {
    client: Client,
    api_key: Option<String>,
    query: String,
}

impl NewsDataClient {
    pub fn new(api_key: Option<String>, query: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            query,
        })
    }

    /// Fetch the latest English-language articles for the configured query.
    pub async fn fetch_recent(&self) -> Vec<Article> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("NEWSDATA_API_KEY not set, skipping news fetch");
            return Vec::new();
        };

        match self.try_fetch(api_key).await {
            Ok(articles) => {
                debug!("Fetched {} news articles", articles.len());
                articles
            }
            Err(e) => {
                warn!("News fetch failed, continuing without news: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, api_key: &str) -> Result<Vec<Article>> {
        let response = self
            .client
            .get(NEWS_URL)
            .query(&[("apikey", api_key), ("q", self.query.as_str()), ("language", "en")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "NewsData API error: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_articles(&body)
    }
}

fn parse_articles(body: &str) -> Result<Vec<Article>> {
    let data: NewsDataResponse = serde_json::from_str(body)?;
    Ok(data.results.into_iter().map(Article::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles_maps_fields() {
        let body = r#"{
            "status": "success",
            "totalResults": 2,
            "results": [
                {
                    "title": "Gold climbs as dollar weakens",
                    "source_id": "reuters",
                    "pubDate": "2024-03-14 06:12:00",
                    "link": "https://example.com/a"
                },
                {
                    "title": null,
                    "source_id": null,
                    "pubDate": null,
                    "link": null
                }
            ]
        }"#;
        let articles = parse_articles(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "reuters");
        assert_eq!(articles[0].published_at, "2024-03-14 06:12:00");
        assert_eq!(articles[0].url.as_deref(), Some("https://example.com/a"));
        assert_eq!(articles[1].title, "");
        assert_eq!(articles[1].source, "Unknown");
    }

    #[test]
    fn test_parse_articles_without_results() {
        let articles = parse_articles(r#"{"status": "error"}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_articles_rejects_garbage() {
        assert!(parse_articles("not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_key_yields_no_articles() {
        let client = NewsDataClient::new(None, "gold".to_string(), 5).unwrap();
        assert!(client.fetch_recent().await.is_empty());
    }
}
