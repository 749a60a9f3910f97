//! Yahoo Finance API client for daily price history.
//!
//! Uses the unofficial chart endpoint (no API key required).

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::types::PriceBar;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    /// Create a client whose requests time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self { client })
    }

    /// Fetch daily bars for a symbol, oldest first.
    ///
    /// Arguments:
    /// - symbol: Yahoo symbol (e.g., "GC=F" for gold futures)
    /// - range: Time range ("1mo", "3mo", "6mo", "1y", "2y", "5y", "max")
    /// - interval: Bar interval ("1d", "1wk", "1mo")
    pub async fn get_daily_bars(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Vec<PriceBar>> {
        let url = format!("{}/{}", CHART_URL, symbol);
        debug!("Fetching Yahoo Finance data: {} range={} interval={}", url, range, interval);

        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", interval), ("includePrePost", "false")])
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Yahoo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {}",
                response.status()
            )));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Yahoo parse error: {}", e)))?;

        let bars = chart_to_bars(data)?;
        if bars.is_empty() {
            warn!("Yahoo returned no usable bars for {}", symbol);
            return Err(AppError::InputUnavailable(format!(
                "no price data for {}",
                symbol
            )));
        }

        debug!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

/// Convert a chart response into bars, skipping points without a positive close.
fn chart_to_bars(data: YahooChartResponse) -> Result<Vec<PriceBar>> {
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let close = closes.get(i).copied().flatten().unwrap_or(0.0);
        if close <= 0.0 {
            continue;
        }
        let Some(date) = DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten().unwrap_or(close);

        let bar = PriceBar {
            date,
            open: field(&opens),
            high: field(&highs),
            low: field(&lows),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0.0),
        };

        // Intraday refreshes can repeat the last session's date.
        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}
