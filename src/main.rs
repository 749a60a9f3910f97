use aurum::config::Config;
use aurum::services::SqliteStore;
use aurum::{api, AppState};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurum=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Aurum server on {}:{}", config.host, config.port);
    info!(
        "Tracking {} (range={}, interval={})",
        config.price_symbol, config.price_range, config.price_interval
    );
    if config.newsdata_api_key.is_none() {
        warn!("NEWSDATA_API_KEY not set, analysis will run without news sentiment");
    }

    // Open the history database
    let store = SqliteStore::new(&config.database_path)?;
    info!("Using database {}", config.database_path);

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, store)?;

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Aurum server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
