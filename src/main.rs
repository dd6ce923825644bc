use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod models;
mod services;
mod store;

use config::Config;
use constants::API_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dragman_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Dragman Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("App domain: {}", config.app_domain);
    tracing::info!("API Version: {}", API_VERSION);

    if config.is_development() {
        tracing::warn!("Running in development mode; all state resets on restart");
    }

    let app_state = api::AppState::new(config.clone());

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Authentication
        .route(
            "/api/v1/auth",
            get(api::auth::verify).post(api::auth::confirm),
        )
        // Mini app lifecycle webhook
        .route("/api/v1/webhook", post(api::webhook::receive))
        // Challenges
        .route(
            "/api/v1/challenge",
            post(api::challenge::create).get(api::challenge::get),
        )
        // Share
        .route("/share", get(api::share::share_page))
        .route("/api/v1/share", post(api::share::record_share))
        // Simulated sponsored transactions
        .route(
            "/api/v1/transactions/sponsored",
            post(api::transactions::execute_sponsored),
        )
        .route(
            "/api/v1/transactions/batch",
            post(api::transactions::execute_batch),
        )
        .route(
            "/api/v1/transactions/usage",
            get(api::transactions::get_usage),
        )
        .route(
            "/api/v1/transactions/budget",
            get(api::transactions::get_budget),
        )
        // Leaderboard
        .route("/api/v1/leaderboard", get(api::leaderboard::get_leaderboard))
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
