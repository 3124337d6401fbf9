//! Compras Server
//!
//! HTTP server for purchase-order intake and partida budgets.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (./compras.db, port 3000)
//! compras-server
//!
//! # Start with custom config
//! compras-server --config /etc/compras/compras.toml
//!
//! # Start with environment overrides
//! COMPRAS__SERVER__PORT=8080 compras-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use compras_api::{create_router, AppState};
use compras_db::Database;

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Compras Server - purchase orders checked against partida funds
#[derive(Parser, Debug)]
#[command(name = "compras-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "COMPRAS_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "COMPRAS_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "COMPRAS_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COMPRAS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "COMPRAS_LOG_FORMAT")]
    log_format: Option<String>,

    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl Args {
    /// Command-line values win over every configuration source
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Compras Server"
    );

    let db = init_database(&server_config.database).await?;
    let state = Arc::new(AppState::new(db));
    let app = create_router(state, (&server_config.api).into());

    if server_config.metrics.enabled {
        start_metrics_exporter(&server_config.metrics)?;
    }

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
        _ => subscriber
            .with(fmt::layer().pretty().with_target(true))
            .try_init()?,
    }

    Ok(())
}

/// Open the pool, migrate, and check the database answers
async fn init_database(settings: &config::DatabaseSettings) -> anyhow::Result<Arc<Database>> {
    tracing::info!("Connecting to database...");

    let db = Database::connect(&settings.into()).await?;

    if settings.run_migrations {
        db.migrate().await?;
    }

    let health = db.health_check().await?;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!(sqlite = health.sqlite, "Database health check passed");

    Ok(Arc::new(db))
}

/// Install the Prometheus recorder and its scrape listener
fn start_metrics_exporter(config: &config::MetricsConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(port = config.port, "Metrics exporter started");

    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for Ctrl+C or SIGTERM, then give in-flight requests `timeout`
/// before the process is forced down.
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!(timeout_secs = timeout.as_secs(), "Shutdown grace period elapsed, exiting");
        std::process::exit(1);
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["compras-server", "--port", "8080", "--database-url", "sqlite::memory:"]);
        assert_eq!(args.port, Some(8080));

        let mut config = ServerConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn test_init_database_migrates_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = config::DatabaseSettings {
            url: format!("sqlite://{}", dir.path().join("compras.db").display()),
            ..Default::default()
        };

        let db = init_database(&settings).await.unwrap();
        let cuenta = db.cuenta_contable_repo().find_by_partida("76").await.unwrap();
        assert!(cuenta.is_some());
    }
}
