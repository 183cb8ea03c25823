//! Database initialization
//!
//! Creates every catalog table idempotently, installs the comment
//! `modified` triggers and seeds the settings the services depend on.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Tables in drop order (children before parents)
const TABLES: &[&str] = &[
    "song_comments",
    "album_comments",
    "artist_comments",
    "song_artist_link",
    "album_genre_link",
    "artist_genre_link",
    "song_meta",
    "album_meta",
    "artist_meta",
    "songs",
    "albums",
    "artists",
    "genres",
    "users",
    "settings",
    "schema_version",
];

/// Open (or create) the database at `db_path` and bring the schema up to date
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas go on the connect options so every pooled connection gets them
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open an existing database without write access
///
/// The file must already exist; the schema is not touched.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "Database not found: {} (start xiamiu-api or run xiamiu-seed first)",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("Opened database read-only: {}", db_path.display());
    Ok(pool)
}

/// Single-connection in-memory database with the full schema
///
/// Each SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables, triggers and default settings (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_settings_table(pool).await?;

    create_genres_table(pool).await?;
    create_artists_table(pool).await?;
    create_albums_table(pool).await?;
    create_songs_table(pool).await?;
    create_users_table(pool).await?;

    create_meta_tables(pool).await?;
    create_link_tables(pool).await?;
    create_comment_tables(pool).await?;
    create_comment_triggers(pool).await?;

    record_schema_version(pool).await?;
    init_default_settings(pool).await?;

    Ok(())
}

/// Drop every table and recreate the empty schema
pub async fn reset_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = OFF").execute(pool).await?;
    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    warn!("All tables dropped, recreating schema");
    create_schema(pool).await
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn record_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;
    Ok(())
}

/// Create the settings table
///
/// Stores service key-value pairs (token secret and friends).
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK (length(name) <= 50),
            info TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            artist_id TEXT PRIMARY KEY CHECK (length(artist_id) <= 20),
            name TEXT NOT NULL CHECK (length(name) <= 50),
            reign TEXT NOT NULL DEFAULT '' CHECK (length(reign) <= 50)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_reign ON artists(reign)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_albums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            album_id TEXT PRIMARY KEY CHECK (length(album_id) <= 20),
            name TEXT NOT NULL CHECK (length(name) <= 255),
            artist_id TEXT NOT NULL REFERENCES artists(artist_id),
            album_lan TEXT NOT NULL DEFAULT '' CHECK (length(album_lan) <= 10),
            release_date DATE NOT NULL,
            album_category TEXT NOT NULL DEFAULT '' CHECK (length(album_category) <= 20),
            record_label TEXT NOT NULL DEFAULT '' CHECK (length(record_label) <= 50),
            star INTEGER NOT NULL CHECK (star BETWEEN 1 AND 100),
            listen_date DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_albums_artist ON albums(artist_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_albums_lan ON albums(album_lan)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            song_id TEXT PRIMARY KEY CHECK (length(song_id) <= 20),
            name TEXT NOT NULL CHECK (length(name) <= 255),
            star INTEGER NOT NULL CHECK (star BETWEEN 1 AND 5),
            album_id TEXT NOT NULL REFERENCES albums(album_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_album ON songs(album_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_name TEXT NOT NULL UNIQUE CHECK (length(user_name) <= 50),
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            age INTEGER,
            gender TEXT NOT NULL DEFAULT '',
            constellation TEXT NOT NULL DEFAULT '',
            play_count INTEGER NOT NULL DEFAULT 0,
            join_time DATE NOT NULL DEFAULT CURRENT_DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_meta_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_meta (
            song_id TEXT PRIMARY KEY REFERENCES songs(song_id) ON DELETE CASCADE,
            lyrics TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_meta (
            artist_id TEXT PRIMARY KEY REFERENCES artists(artist_id) ON DELETE CASCADE,
            info TEXT NOT NULL DEFAULT '',
            pic_address TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_meta (
            album_id TEXT PRIMARY KEY REFERENCES albums(album_id) ON DELETE CASCADE,
            info TEXT NOT NULL DEFAULT '',
            pic_address TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_link_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_genre_link (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_id TEXT NOT NULL REFERENCES artists(artist_id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
            UNIQUE(artist_id, genre_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_genre_link (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            album_id TEXT NOT NULL REFERENCES albums(album_id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
            UNIQUE(album_id, genre_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_artist_link (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_id TEXT NOT NULL REFERENCES songs(song_id) ON DELETE CASCADE,
            artist_id TEXT NOT NULL REFERENCES artists(artist_id) ON DELETE CASCADE,
            UNIQUE(song_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_comment_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_id TEXT NOT NULL REFERENCES songs(song_id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            comment TEXT NOT NULL CHECK (length(comment) <= 255),
            star INTEGER NOT NULL CHECK (star BETWEEN 1 AND 5),
            num_like INTEGER NOT NULL DEFAULT 0,
            review_date DATE NOT NULL DEFAULT CURRENT_DATE,
            created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album_comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            album_id TEXT NOT NULL REFERENCES albums(album_id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            comment TEXT NOT NULL CHECK (length(comment) <= 255),
            star INTEGER NOT NULL CHECK (star BETWEEN 1 AND 100),
            num_like INTEGER NOT NULL DEFAULT 0,
            review_date DATE NOT NULL DEFAULT CURRENT_DATE,
            created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_id TEXT NOT NULL REFERENCES artists(artist_id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            comment TEXT NOT NULL CHECK (length(comment) <= 255),
            num_like INTEGER NOT NULL DEFAULT 0,
            review_date DATE NOT NULL DEFAULT CURRENT_DATE,
            created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            modified TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    for (table, column) in [
        ("song_comments", "song_id"),
        ("album_comments", "album_id"),
        ("artist_comments", "artist_id"),
    ] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})"
        ))
        .execute(pool)
        .await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id)"
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Refresh `modified` whenever comment content changes
///
/// The trigger only fires on the listed columns, so its own UPDATE of
/// `modified` does not recurse.
async fn create_comment_triggers(pool: &SqlitePool) -> Result<()> {
    for (table, columns) in [
        ("song_comments", "comment, star, num_like"),
        ("album_comments", "comment, star, num_like"),
        ("artist_comments", "comment, num_like"),
    ] {
        sqlx::query(&format!(
            r#"
            CREATE TRIGGER IF NOT EXISTS {table}_touch_modified
            AFTER UPDATE OF {columns} ON {table}
            FOR EACH ROW
            BEGIN
                UPDATE {table} SET modified = CURRENT_TIMESTAMP WHERE id = NEW.id;
            END
            "#
        ))
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "token_ttl_minutes", "30").await?;
    crate::db::settings::ensure_token_secret(pool).await?;
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// A NULL value is reset to the default.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    match value {
        None => {
            sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(default_value)
                .execute(pool)
                .await?;
            info!("Initialized setting '{}' with default value: {}", key, default_value);
        }
        Some(None) => {
            sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
                .bind(default_value)
                .bind(key)
                .execute(pool)
                .await?;
            warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
        }
        Some(Some(_)) => {}
    }

    Ok(())
}
