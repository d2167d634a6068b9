use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod crypto;
mod db;
mod error;
mod integrations;
mod models;
mod services;
mod utils;
mod websocket;

use config::Config;
use constants::API_VERSION;
use integrations::GiftCodeClient;
use services::{NotificationService, RedemptionWorkflow, RosterStore, ViewStateStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wos_giftcode=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting gift code redeemer");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    let store = db::open_store(&config).await?;
    let store_backend = store.backend();
    tracing::info!("Using {} store", store_backend);

    // A roster that cannot be read must not be silently replaced by an empty one.
    let roster = Arc::new(RosterStore::load(store.clone()).await?);
    let view_state = Arc::new(ViewStateStore::restore(store).await);
    let notices = Arc::new(NotificationService::new(config.error_notice_ttl()));

    let client = GiftCodeClient::from_config(&config)?;
    let workflow = Arc::new(RedemptionWorkflow::new(
        Arc::new(client),
        roster.clone(),
        notices.clone(),
        config.redeem_pacing(),
    ));

    let app_state = api::AppState {
        config: config.clone(),
        roster,
        view_state: view_state.clone(),
        notices,
        workflow,
        store_backend,
    };

    let app = build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Same hand-off as a page unload.
    if let Err(e) = view_state.persist_current().await {
        tracing::error!("Failed to save grid state on shutdown: {}", e);
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Roster
        .route(
            "/api/v1/players",
            get(api::players::list_players).post(api::players::add_player),
        )
        .route("/api/v1/players/remove", post(api::players::remove_players))
        // Redemption
        .route("/api/v1/redeem", post(api::redeem::redeem_code))
        // Grid view state
        .route(
            "/api/v1/view-state",
            get(api::view_state::get_view_state).put(api::view_state::put_view_state),
        )
        .route("/api/v1/view-state/unload", post(api::view_state::unload))
        // Error notice
        .route(
            "/api/v1/notice",
            get(api::notice::get_notice).delete(api::notice::dismiss_notice),
        )
        // WebSocket endpoints
        .route("/ws/roster", get(websocket::roster::handler))
        .layer(TraceLayer::new_for_http())
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
