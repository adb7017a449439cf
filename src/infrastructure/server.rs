// Infrastructure: Server setup and configuration
// Single Responsibility: Manage server lifecycle and configuration

use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::StatusCode, Router};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use super::config::AppConfig;
use super::cors::build_cors_layer;
use super::shutdown::shutdown_signal;
use crate::application::{routes, AppState};

/// Multipart framing overhead allowed on top of the file itself
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub state: AppState,
    pub app: AppConfig,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, state: AppState, app: AppConfig) -> Self {
        Self {
            address,
            state,
            app,
        }
    }
}

/// Full application router: API routes, static fallback and server layers
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = routes(state);

    if let Some(dir) = &config.server.static_dir {
        if dir.is_dir() {
            router = router
                .fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
        } else {
            tracing::warn!(
                path = %dir.display(),
                "static_dir is not a directory; static files disabled"
            );
        }
    }

    let body_limit = config.upload.max_upload_bytes().saturating_add(BODY_LIMIT_SLACK);

    router = router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(&config.cors) {
        router = router.layer(cors);
    }

    router
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let router = build_router(config.state, &config.app);
    let listener = tokio::net::TcpListener::bind(config.address).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        model = %config.app.chat.model,
        max_degree = config.app.solver.max_degree,
        "Synaptic backend listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
