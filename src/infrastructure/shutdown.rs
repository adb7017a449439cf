use tokio::signal;

/// Resolves on Ctrl+C or SIGTERM; used for graceful shutdown of the server
pub async fn shutdown_signal() {
    tokio::select! {
        _ = wait_ctrl_c() => {},
        _ = wait_sigterm() => {},
    }

    tracing::info!("Shutdown signal received, initiating graceful shutdown");
}

async fn wait_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => {
            tracing::error!(%e, "Error handling Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait_sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        Err(e) => {
            tracing::error!(%e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_sigterm() {
    std::future::pending::<()>().await
}
