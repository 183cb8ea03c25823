//! Genre queries

use crate::db::models::{Album, Artist, Genre, GenreCreate};
use crate::db::duplicate_or;
use crate::{Error, Result};
use sqlx::SqlitePool;

pub async fn get_genre(pool: &SqlitePool, id: i64) -> Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>("SELECT id, name, info FROM genres WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(genre)
}

pub async fn get_genre_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>("SELECT id, name, info FROM genres WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(genre)
}

pub async fn list_genres(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>(
        "SELECT id, name, info FROM genres ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(genres)
}

/// Insert a genre; its name must be unused
pub async fn create_genre(pool: &SqlitePool, genre: &GenreCreate) -> Result<Genre> {
    if get_genre_by_name(pool, &genre.name).await?.is_some() {
        return Err(Error::Duplicate("Genre already registered".to_string()));
    }

    let id = sqlx::query("INSERT INTO genres (name, info) VALUES (?, ?)")
        .bind(&genre.name)
        .bind(&genre.info)
        .execute(pool)
        .await
        .map_err(|e| duplicate_or(e, "Genre already registered"))?
        .last_insert_rowid();

    Ok(Genre {
        id,
        name: genre.name.clone(),
        info: genre.info.clone(),
    })
}

/// Ids from `ids` that have no genre row
pub async fn missing_genre_ids(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<i64>> {
    let mut missing = Vec::new();
    for &id in ids {
        if get_genre(pool, id).await?.is_none() {
            missing.push(id);
        }
    }
    Ok(missing)
}

pub async fn list_genre_artists(
    pool: &SqlitePool,
    genre_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(
        r#"
        SELECT a.artist_id, a.name, a.reign
        FROM artists a
        JOIN artist_genre_link l ON l.artist_id = a.artist_id
        WHERE l.genre_id = ?
        ORDER BY a.artist_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(genre_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

pub async fn list_genre_albums(
    pool: &SqlitePool,
    genre_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Album>> {
    let albums = sqlx::query_as::<_, Album>(
        r#"
        SELECT a.album_id, a.name, a.artist_id, a.album_lan, a.release_date,
               a.album_category, a.record_label, a.star, a.listen_date
        FROM albums a
        JOIN album_genre_link l ON l.album_id = a.album_id
        WHERE l.genre_id = ?
        ORDER BY a.album_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(genre_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(albums)
}
