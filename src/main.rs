//! Freight admin panel server.

use axum::Router;
use freight_admin::config::Config;
use freight_admin::startup::build_app;
use freight_admin_telemetry::{TelemetryConfig, setup_telemetry};
use tokio::signal;
use tracing::info;

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;
    let telemetry = setup_telemetry(&TelemetryConfig {
        log_level: config.log_level.clone(),
        json_logs: config.json_logs,
        otlp_endpoint: config.otlp_endpoint.clone(),
        environment: config.environment.clone(),
        version: Some(VERSION.to_string()),
    });

    info!(
        version = VERSION,
        address = %config.http_address,
        prefix = %config.admin_prefix,
        database = config.db_url.is_some(),
        otlp = config.otlp_endpoint.is_some(),
        pid = std::process::id(),
        "Starting freight-admin"
    );

    let (app, addr) = build_app(&config, metrics_routes()).await?;

    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    info!("Shutdown complete");
    Ok(())
}

#[cfg(feature = "prometheus")]
fn metrics_routes() -> Router {
    freight_admin::routes::metrics_routes(freight_admin_telemetry::init_metrics())
}

#[cfg(not(feature = "prometheus"))]
fn metrics_routes() -> Router {
    Router::new()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
