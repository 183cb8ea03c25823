//! xiamiu-pages - legacy server-rendered Xiamiu site

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xiamiu_common::config::{CompiledDefaults, LoggingConfig, RootFolderInitializer, RootFolderResolver};
use xiamiu_common::db;
use xiamiu_pages::{build_router, AppState};

/// Default HTTP port
const DEFAULT_PORT: u16 = 8080;

/// Command-line arguments for xiamiu-pages
#[derive(Parser, Debug)]
#[command(name = "xiamiu-pages")]
#[command(about = "Server-rendered pages for the Xiamiu music catalog")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "XIAMIU_PAGES_PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(short, long, env = "XIAMIU_BIND_ADDRESS")]
    bind: Option<String>,

    /// Folder holding xiamiu.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},tower_http=info", logging.level).into());

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = RootFolderResolver::new("pages");
    let toml_config = resolver.load_toml();
    init_tracing(&toml_config.logging)?;

    info!(
        "Starting Xiamiu Pages (xiamiu-pages) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = args.root_folder.unwrap_or_else(|| resolver.resolve());
    let db_path = RootFolderInitializer::new(root_folder).database_path();
    info!("Database path: {}", db_path.display());

    let pool = match db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool));

    let bind = args
        .bind
        .or(toml_config.bind_address)
        .unwrap_or_else(|| CompiledDefaults::for_current_platform().bind_address);
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("xiamiu-pages listening on http://{}", addr);

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
