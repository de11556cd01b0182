//! Tripnote Backend Server
//!
//! Serves user registration, login and token-gated travel reviews over a
//! single-file SQLite store.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tripnote_server::app_state::AppState;
use tripnote_server::config::AppConfig;
use tripnote_server::middleware::{request_timeout, request_tracing};
use tripnote_server::routes::create_router;
use tripnote_server::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tripnote_server=info,tower_http=info")),
        )
        .init();

    // Refuse to start without a usable signing secret
    let config = AppConfig::from_env().context("invalid configuration")?;

    let pool = store::connect(&config.database)
        .await
        .context("failed to open database")?;
    store::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    let state = AppState::build(pool, &config, Arc::new(mockable::DefaultClock))
        .context("failed to initialise password hasher")?;

    let app = request_timeout(create_router(state), config.request_timeout)
        .layer(request_tracing())
        .layer(build_cors_layer(&config.cors_allowed_origins));

    let addr = config.socket_addr();
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
