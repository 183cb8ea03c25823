//! User queries

use crate::auth::hash_password;
use crate::db::duplicate_or;
use crate::db::models::{User, UserCreate, UserRecord};
use crate::time::today;
use crate::{Error, Result};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, user_name, location, age, gender, constellation, play_count, join_time";

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn get_user_by_name(pool: &SqlitePool, user_name: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE user_name = ?"
    ))
    .bind(user_name)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Users row with credentials, for login
pub async fn get_user_record_by_name(
    pool: &SqlitePool,
    user_name: &str,
) -> Result<Option<UserRecord>> {
    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, user_name, password_hash, password_salt, location, age,
               gender, constellation, play_count, join_time
        FROM users WHERE user_name = ?
        "#,
    )
    .bind(user_name)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

pub async fn list_users(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Register a user, hashing the password with a fresh salt
pub async fn create_user(pool: &SqlitePool, user: &UserCreate) -> Result<User> {
    if get_user_by_name(pool, &user.user_name).await?.is_some() {
        return Err(Error::Duplicate("Username already registered".to_string()));
    }

    let hashed = hash_password(&user.password);
    let join_time = user.join_time.unwrap_or_else(today);

    let id = sqlx::query(
        r#"
        INSERT INTO users (user_name, password_hash, password_salt, location, age,
                           gender, constellation, play_count, join_time)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_name)
    .bind(&hashed.hash)
    .bind(&hashed.salt)
    .bind(&user.location)
    .bind(user.age)
    .bind(&user.gender)
    .bind(&user.constellation)
    .bind(user.play_count)
    .bind(join_time)
    .execute(pool)
    .await
    .map_err(|e| duplicate_or(e, "Username already registered"))?
    .last_insert_rowid();

    Ok(User {
        id,
        user_name: user.user_name.clone(),
        location: user.location.clone(),
        age: user.age,
        gender: user.gender.clone(),
        constellation: user.constellation.clone(),
        play_count: user.play_count,
        join_time,
    })
}

/// Every users row with credentials (seed export)
pub async fn list_user_records(pool: &SqlitePool) -> Result<Vec<UserRecord>> {
    let records = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, user_name, password_hash, password_salt, location, age,
               gender, constellation, play_count, join_time
        FROM users ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}
