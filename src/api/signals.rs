//! Signal history endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::types::SignalRecord;
use crate::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 1000;

/// Query parameters for the history endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Number of records to return, newest first.
    pub limit: Option<usize>,
}

impl HistoryQuery {
    fn resolved_limit(&self) -> Result<usize> {
        match self.limit {
            Some(0) => Err(AppError::BadRequest("limit must be positive".to_string())),
            Some(n) => Ok(n.min(MAX_LIMIT)),
            None => Ok(DEFAULT_LIMIT),
        }
    }
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}

async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<SignalRecord>>>> {
    let limit = query.resolved_limit()?;
    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.recent_signals(limit))
        .await
        .map_err(|e| AppError::Internal(format!("history task failed: {}", e)))??;
    Ok(Json(ApiResponse::new(records)))
}
