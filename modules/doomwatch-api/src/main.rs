use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doomwatch_common::Config;
use doomwatch_discovery::classifier::ClaudeClassifier;
use doomwatch_discovery::collector::LiveFetcher;
use doomwatch_discovery::pipeline::DiscoveryPipeline;
use doomwatch_discovery::store::SanityStore;

mod routes;

pub struct AppState {
    pub pipeline: DiscoveryPipeline,
    pub config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("doomwatch=info".parse()?))
        .init();

    let config = Config::from_env();

    if !config.auth_configured() {
        warn!("DISCOVERY_SECRET not set — the discovery trigger is UNAUTHENTICATED");
    }

    // External clients are constructed once here and injected; no stage
    // builds its own.
    let pipeline = DiscoveryPipeline::new(
        Arc::new(LiveFetcher::new(&config)),
        Arc::new(ClaudeClassifier::new(&config.anthropic_api_key)),
        Arc::new(SanityStore::new(&config)),
    );

    let state = Arc::new(AppState {
        pipeline,
        config: config.clone(),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Discovery trigger + configuration diagnostic
        .route("/api/discover", post(routes::trigger_discovery))
        .route("/api/discover/status", get(routes::discovery_status))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only (no query params, no bodies)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Doomwatch API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
