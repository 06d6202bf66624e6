//! HTTP server lifecycle: bind → serve → graceful shutdown on ctrl-c.

use std::net::SocketAddr;

use crate::api::router::api_router;
use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Bind the configured address and serve until interrupted.
pub async fn serve(config: &AppConfig, ctx: ApiContext) -> std::io::Result<()> {
    let listener =
        tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;

    tracing::info!(%addr, "Server starting");
    if config.langsmith_tracing {
        tracing::info!(project = %config.langsmith_project, "LangSmith tracing enabled");
    }

    axum::serve(listener, api_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
