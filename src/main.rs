mod api;
mod binding;
mod config;
mod connection;
mod runner;
mod search;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::connection::Connection;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting search binding probe");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Binding variable: {}", config.binding.env_var);
    info!("   - Index: {}/{}", config.search.index, config.search.doc_type);
    info!("   - Max retries: {}", config.search.max_retries);
    info!("   - Server: {}", config.listen_addr());

    // Resolve binding and build the shared search client
    info!("🔍 Resolving service binding...");
    let connection = Connection::establish(&config);
    match connection.binding_name() {
        Some(name) => info!("✅ Search client ready (binding: {})", name),
        None => info!("⚠️  No search client, requests will report the failure"),
    }

    let addr = config.listen_addr();
    let app = api::router(AppState::new(config, connection));

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   ANY  /                 - Run diagnostics");
    info!("   GET  /health           - Health check");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
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

    info!("🛑 Shutdown signal received");
}
