//! crypto-portfolio-bot HTTP Server
//!
//! Axum-based front end for the portfolio conversation machine. A chat
//! adapter posts each user event to `/api/events` and renders the returned
//! replies and buttons.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bot_core::MemorySessionStore;
use crypto_portfolio::{
    ConversationMachine, DexScreenerOracle, FileDocumentStore, PortfolioBotConfig, PortfolioStore,
    PriceCache, PriceFetcher,
};

use crate::handlers::{health_check, post_event};
use crate::state::AppState;

/// Router with all endpoints and middleware
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/events", post(post_event))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PortfolioBotConfig::from_env()?;
    tracing::info!(
        users = config.authorized_users.len(),
        cache_expiry_secs = config.cache_expiry.as_secs(),
        store = %config.store_path.display(),
        "Configuration loaded"
    );

    let documents = Arc::new(FileDocumentStore::new(&config.store_path));
    let store = Arc::new(PortfolioStore::new(documents));

    let oracle = Arc::new(DexScreenerOracle::new(
        config.price_api_url.clone(),
        config.price_api_timeout,
    ));
    let cache = Arc::new(PriceCache::new(config.cache_expiry));
    let prices = Arc::new(PriceFetcher::new(oracle, cache));

    let machine = ConversationMachine::from_config(
        &config,
        store.clone(),
        prices,
        Arc::new(MemorySessionStore::new()),
    );

    let state = AppState {
        machine: Arc::new(machine),
        store,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("crypto-portfolio-bot running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  POST /api/events - Deliver a user event");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
