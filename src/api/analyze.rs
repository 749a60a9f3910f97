//! On-demand analysis endpoint.
//!
//! Fetches prices and news, runs the batch pipeline off the async runtime,
//! persists the outcome and returns the report bundle.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tracing::info;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::AnalysisInput;
use crate::types::AnalysisReport;
use crate::AppState;

/// Create the analyze router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(analyze))
}

async fn analyze(State(state): State<AppState>) -> Result<Json<ApiResponse<AnalysisReport>>> {
    let config = &state.config;
    let (bars, articles) = tokio::join!(
        state.yahoo.get_daily_bars(
            &config.price_symbol,
            &config.price_range,
            &config.price_interval
        ),
        state.news.fetch_recent(),
    );
    let bars = bars?;

    let pipeline = state.pipeline.clone();
    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || -> Result<AnalysisReport> {
        let input = AnalysisInput {
            bars,
            articles,
            weekly_history: store.load_history()?,
            now: Utc::now(),
        };
        let outcome = pipeline.run(input)?;
        store.record_outcome(&outcome)?;
        Ok(outcome.report)
    })
    .await
    .map_err(|e| AppError::Internal(format!("analysis task failed: {}", e)))??;

    info!(
        "Analysis complete: {} at {:.2} (confidence {:.1})",
        report.combined_signal.signal, report.latest_price, report.combined_confidence
    );

    Ok(Json(ApiResponse::new(report)))
}
