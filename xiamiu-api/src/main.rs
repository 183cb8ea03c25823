//! xiamiu-api - REST API server for the Xiamiu music catalog

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xiamiu_api::{build_router, AppState};
use xiamiu_common::config::{
    resolve_token_ttl, CompiledDefaults, LoggingConfig, RootFolderInitializer,
    RootFolderResolver,
};
use xiamiu_common::db::{self, settings};

/// Default HTTP port
const DEFAULT_PORT: u16 = 8000;

/// Command-line arguments for xiamiu-api
#[derive(Parser, Debug)]
#[command(name = "xiamiu-api")]
#[command(about = "REST API for the Xiamiu music catalog")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "XIAMIU_API_PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(short, long, env = "XIAMIU_BIND_ADDRESS")]
    bind: Option<String>,

    /// Folder holding xiamiu.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Lifetime of issued bearer tokens
    #[arg(long, env = "XIAMIU_TOKEN_TTL_MINUTES")]
    token_ttl_minutes: Option<i64>,
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

    let resolver = RootFolderResolver::new("api");
    let toml_config = resolver.load_toml();
    init_tracing(&toml_config.logging)?;

    info!(
        "Starting Xiamiu API (xiamiu-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = args.root_folder.unwrap_or_else(|| resolver.resolve());
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let token_secret = settings::load_token_secret(&pool)
        .await
        .context("Failed to load token secret")?;

    let stored_ttl = settings::get_setting(&pool, "token_ttl_minutes")
        .await?
        .and_then(|value| value.parse::<i64>().ok());
    let token_ttl_minutes = resolve_token_ttl([
        ("command line", args.token_ttl_minutes),
        ("config file", toml_config.token_ttl_minutes),
        ("settings table", stored_ttl),
    ]);
    info!("Token lifetime: {} minutes", token_ttl_minutes);

    let state = AppState::new(pool, token_secret, token_ttl_minutes);
    let app = build_router(state);

    let bind = args
        .bind
        .or(toml_config.bind_address)
        .unwrap_or_else(|| CompiledDefaults::for_current_platform().bind_address);
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("xiamiu-api listening on http://{}", addr);
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
