//! carewatch-monitor - care-monitoring backend
//!
//! Tracks dependents' activities (manual and predicted), anomaly alerts and
//! medication intakes, and streams classified sensor activity to connected
//! dashboards over WebSocket.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carewatch_common::config::MonitorConfig;
use carewatch_common::db;
use carewatch_monitor::classifier::HeuristicClassifier;
use carewatch_monitor::sensors::SimulatedSensors;
use carewatch_monitor::{build_router, reconcile, AppState};

/// Command-line arguments for carewatch-monitor
#[derive(Parser, Debug)]
#[command(name = "carewatch-monitor")]
#[command(about = "Care-monitoring backend service")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CAREWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "CAREWATCH_PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides config)
    #[arg(short, long, env = "CAREWATCH_DATABASE")]
    database: Option<PathBuf>,

    /// Seconds between ingestion cycles (overrides config)
    #[arg(long, env = "CAREWATCH_MONITOR_INTERVAL")]
    monitor_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carewatch_monitor=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting CareWatch Monitor v{}", env!("CARGO_PKG_VERSION"));

    // Config file, then CLI/env overrides
    let mut config = MonitorConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(interval) = args.monitor_interval {
        config.monitor_interval_secs = interval;
    }

    info!("Database path: {}", config.database_path.display());
    info!(
        "Ingestion interval: {}s, sweep interval: {}s",
        config.monitor_interval_secs, config.sweep_interval_secs
    );

    let pool = db::connect(&config.database_path)
        .await
        .context("Failed to open database")?;
    db::init_schema(&pool)
        .await
        .context("Failed to initialize database schema")?;

    // Process-wide sensor source and classifier, injected into every loop
    let sensors = Arc::new(SimulatedSensors::new());
    let classifier = Arc::new(HeuristicClassifier::new());

    // Background reconciliation sweep
    tokio::spawn(reconcile::run_background_sweeps(
        pool.clone(),
        config.sweep_interval(),
    ));

    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .context("Invalid host address in configuration")?,
        config.port,
    );

    let state = AppState::new(pool, config, sensors, classifier);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("carewatch-monitor listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
