//! # devhubd — devhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (optional file path as first CLI argument, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the repository implementation (adapter)
//! - Construct the application service, injecting the repository via its port trait
//! - Build the axum router, injecting the application service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use devhub_adapter_http_axum::state::AppState;
use devhub_adapter_storage_sqlite_sqlx::SqliteDeviceRepository;
use devhub_app::services::device_service::DeviceService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_PATH.to_string());
    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = devhub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
        max_connections: config.database.max_connections,
    }
    .build()
    .await?;
    tracing::info!(url = config.database_url(), "database initialised");

    // Repository and service
    let device_repo = SqliteDeviceRepository::new(db.pool().clone());
    let device_service = DeviceService::new(device_repo);

    // HTTP
    let app = devhub_adapter_http_axum::router::build(AppState::new(device_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("devhubd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.pool().close().await;
    tracing::info!("devhubd stopped");
    Ok(())
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
