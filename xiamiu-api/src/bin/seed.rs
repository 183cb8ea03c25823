//! Seed data utility
//!
//! **Usage:**
//! ```bash
//! xiamiu-seed [--root-folder <dir>] load <file.json>
//! xiamiu-seed [--root-folder <dir>] dump <file.json>
//! xiamiu-seed [--root-folder <dir>] reset
//! xiamiu-seed [--root-folder <dir>] remove
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xiamiu_common::config::{RootFolderInitializer, RootFolderResolver};
use xiamiu_common::db;
use xiamiu_common::seed;

/// Load, dump or reset the Xiamiu database
#[derive(Parser, Debug)]
#[command(name = "xiamiu-seed")]
#[command(about = "Load, dump or reset the Xiamiu catalog database")]
#[command(version)]
struct Args {
    /// Folder holding xiamiu.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upsert every row in a seed file (safe to repeat)
    Load {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write the whole database to a seed file
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Drop and recreate every table
    Reset,
    /// Delete the database file
    Remove,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "xiamiu-seed v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = args
        .root_folder
        .unwrap_or_else(|| RootFolderResolver::new("api").resolve());
    let initializer = RootFolderInitializer::new(root_folder);
    let db_path = initializer.database_path();

    match args.command {
        Command::Load { file } => {
            initializer.ensure_directory_exists()?;
            let data = seed::read_seed_file(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let pool = db::init_database(&db_path).await?;
            let summary = seed::import(&pool, data).await.context("Seed import failed")?;
            info!(
                "Loaded {} catalog rows, {} users, {} links, {} comments into {}",
                summary.catalog_rows,
                summary.users,
                summary.links,
                summary.comments,
                db_path.display()
            );
        }
        Command::Dump { file } => {
            if !initializer.database_exists() {
                anyhow::bail!("No database at {}", db_path.display());
            }
            let pool = db::init_database(&db_path).await?;
            let data = seed::export(&pool).await?;
            seed::write_seed_file(&file, &data)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!("Dumped {} to {}", db_path.display(), file.display());
        }
        Command::Reset => {
            initializer.ensure_directory_exists()?;
            let pool = db::init_database(&db_path).await?;
            db::reset_schema(&pool).await?;
            info!("Reset all tables in {}", db_path.display());
        }
        Command::Remove => {
            remove_database(&db_path)?;
        }
    }

    Ok(())
}

/// Delete the database and its WAL side files
fn remove_database(db_path: &std::path::Path) -> Result<()> {
    if !db_path.exists() {
        warn!("No database at {}", db_path.display());
        return Ok(());
    }

    std::fs::remove_file(db_path)
        .with_context(|| format!("Failed to remove {}", db_path.display()))?;

    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            std::fs::remove_file(&side)
                .with_context(|| format!("Failed to remove {}", side.display()))?;
        }
    }

    info!("Removed {}", db_path.display());
    Ok(())
}
