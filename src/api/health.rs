use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
struct HealthResponse {
    /// "ok", or "degraded" when the history database cannot be queried.
    status: &'static str,
    version: &'static str,
}

impl HealthResponse {
    fn new(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.clone();
    let database_ok = match tokio::task::spawn_blocking(move || store.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Health check: database unavailable: {}", e);
            false
        }
        Err(e) => {
            warn!("Health check task failed: {}", e);
            false
        }
    };
    Json(HealthResponse::new(database_ok))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::SqliteStore;

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_value(HealthResponse::new(true)).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_degraded_when_database_unavailable() {
        assert_eq!(HealthResponse::new(false).status, "degraded");
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = AppState::new(Config::from_env(), SqliteStore::new_in_memory().unwrap()).unwrap();
        let Json(response) = health(State(state)).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
