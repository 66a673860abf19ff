//! TripFare HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, build_trip_services, init_logging};
use presentation_http::{AppState, create_app};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

/// TripFare HTTP server
#[derive(Parser)]
#[command(name = "tripfare-server", version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "TRIPFARE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load_from(args.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging)?;

    info!("🚕 TripFare v{} starting...", env!("CARGO_PKG_VERSION"));

    let services = build_trip_services(&config)?;
    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    info!(
        providers = ?services.suggestions.provider_names(),
        profile = %services.routes.profile(),
        remote_fare = services.fares.remote_enabled(),
        "Configuration loaded"
    );

    let app = create_app(AppState::new(services, config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("🚀 Server listening on http://{addr}");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = drain_deadline(shutdown_timeout) => {
            warn!("Connections still open after {shutdown_timeout:?}, exiting");
        }
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Resolves `timeout` after a shutdown signal, bounding connection draining
async fn drain_deadline(timeout: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(timeout).await;
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("📥 Received Ctrl+C, shutting down..."),
        () = terminate => info!("📥 Received SIGTERM, shutting down..."),
    }
}
