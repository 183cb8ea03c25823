//! Settings table access

use crate::{Error, Result};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

/// Settings key holding the bearer token signing secret
pub const TOKEN_SECRET_KEY: &str = "token_secret";

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}

pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Load the token secret, generating and storing one if absent
///
/// The secret is a random non-zero i64.
pub async fn ensure_token_secret(pool: &SqlitePool) -> Result<i64> {
    if let Some(value) = get_setting(pool, TOKEN_SECRET_KEY).await? {
        if let Ok(secret) = value.parse::<i64>() {
            if secret != 0 {
                return Ok(secret);
            }
        }
    }

    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let val = rng.gen::<i64>();
            if val != 0 {
                break val;
            }
        }
    };

    set_setting(pool, TOKEN_SECRET_KEY, &secret.to_string()).await?;
    info!("Generated new token secret");
    Ok(secret)
}

/// Load the token secret; it must already exist
pub async fn load_token_secret(pool: &SqlitePool) -> Result<i64> {
    let value = get_setting(pool, TOKEN_SECRET_KEY)
        .await?
        .ok_or_else(|| Error::Config("token secret missing from settings".to_string()))?;
    value
        .parse::<i64>()
        .map_err(|e| Error::Config(format!("token secret is not an i64: {}", e)))
}
