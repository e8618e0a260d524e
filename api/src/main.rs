//! Radar API Server
//!
//! A thin backend around the Ethos reputation protocol's public REST API:
//! re-shapes and caches upstream responses and exposes reputation-farming
//! ("R4R") analysis over HTTP. Uses hexagonal (ports & adapters)
//! architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::EthosClientImpl;
use app::R4rAnalyzerService;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<R4rAnalyzerService<EthosClientImpl>>,
    pub ethos: Arc<EthosClientImpl>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router. Factored out of `main` so router-level tests can drive
/// the real routing table.
pub fn app(state: AppState) -> Router {
    // Rate limiting config: 2 req/sec sustained, burst of 5.
    // Uses PeerIpKeyExtractor to get client IP from socket connection.
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .expect("Failed to build governor config"),
    );

    // The batch endpoint fans out up to 20 per-user analyses, so it gets
    // the rate limit.
    let rate_limited_routes = Router::new()
        .route(
            "/api/r4r-network-analysis",
            post(handlers::post_network_analysis),
        )
        .layer(GovernorLayer {
            config: governor_config,
        });

    Router::new()
        // Health check
        .route("/health", get(health))
        // R4R analysis endpoints
        .route("/api/r4r-analysis/:userkey", get(handlers::get_r4r_analysis))
        .route("/api/r4r-summary/:userkey", get(handlers::get_r4r_summary))
        .route(
            "/api/review-summary/:userkey",
            get(handlers::get_review_summary),
        )
        // Search proxy
        .route(
            "/api/search-suggestions",
            get(handlers::search_suggestions),
        )
        // Merge rate-limited routes
        .merge(rate_limited_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,radar_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Radar API...");

    // Load configuration
    let config = Config::from_env();

    // Create adapters and services
    let ethos = Arc::new(EthosClientImpl::new(
        config.ethos_api_url.clone(),
        config.ethos_client_header.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    ));
    let analyzer = Arc::new(R4rAnalyzerService::new(ethos.clone()));

    let state = AppState {
        analyzer,
        ethos,
        config: config.clone(),
    };

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
