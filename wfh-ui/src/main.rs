//! wfh-ui - Weekly work-from-home selection service
//!
//! Serves the selection form, JSON API and exports over a CSV ledger.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wfh_common::admin::SharedSecret;
use wfh_common::config::{resolve_config_path, Config, Overrides, TomlConfig};
use wfh_common::{CsvRecordStore, RecordStore, SelectionService};
use wfh_ui::{build_router, AppState};

/// Command-line arguments for wfh-ui
#[derive(Parser, Debug)]
#[command(name = "wfh-ui")]
#[command(about = "Weekly work-from-home day selection service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Selections CSV file
    #[arg(short, long, env = "WFH_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Address to bind to
    #[arg(long, env = "WFH_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WFH_PORT")]
    port: Option<u16>,

    /// Shared secret for admin reset
    #[arg(long, env = "WFH_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WFH_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing so its log level can apply
    let config_path = resolve_config_path(args.config.as_deref());
    let loaded = match &config_path {
        Some(path) => TomlConfig::load(path)?,
        None => None,
    };
    let file_found = loaded.is_some();

    let config = Config::resolve(
        loaded.unwrap_or_default(),
        Overrides {
            data_file: args.data_file,
            bind_address: args.bind_address,
            port: args.port,
            admin_secret: args.admin_secret,
            log_level: args.log_level,
        },
    )?;

    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("wfh_ui={level},wfh_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting WFH selection service (wfh-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&config_path, file_found) {
        (Some(path), true) => info!("Config file: {}", path.display()),
        (Some(path), false) => warn!("Config file {} not found, using defaults", path.display()),
        (None, _) => warn!("No config directory available, using defaults"),
    }
    if config.uses_default_secret() {
        warn!("Admin secret not configured; using the built-in default");
    }

    info!("Data file: {}", config.data_file.display());
    info!("Roster: {} staff", config.roster.len());

    let store = Arc::new(CsvRecordStore::new(config.data_file.clone()));
    match store.load() {
        Ok(table) => info!("Loaded {} stored selections", table.len()),
        Err(e) => error!("Selections file unreadable, requests will fail until fixed: {}", e),
    }

    let service = SelectionService::new(
        store,
        config.roster.clone(),
        Arc::new(SharedSecret::new(config.admin_secret.clone())),
    );
    let app = build_router(AppState::new(Arc::new(service)));

    let ip = config
        .bind_address
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;
    let addr = SocketAddr::new(ip, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("wfh-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
