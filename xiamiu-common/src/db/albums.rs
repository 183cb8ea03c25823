//! Album queries

use crate::db::artists::get_artist;
use crate::db::duplicate_or;
use crate::db::genres::missing_genre_ids;
use crate::db::models::{Album, AlbumCreate, Genre, Song};
use crate::{Error, Result};
use sqlx::SqlitePool;

pub async fn get_album(pool: &SqlitePool, album_id: &str) -> Result<Option<Album>> {
    let album = sqlx::query_as::<_, Album>(
        r#"
        SELECT album_id, name, artist_id, album_lan, release_date,
               album_category, record_label, star, listen_date
        FROM albums WHERE album_id = ?
        "#,
    )
    .bind(album_id)
    .fetch_optional(pool)
    .await?;
    Ok(album)
}

pub async fn list_albums(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Album>> {
    let albums = sqlx::query_as::<_, Album>(
        r#"
        SELECT album_id, name, artist_id, album_lan, release_date,
               album_category, record_label, star, listen_date
        FROM albums
        ORDER BY album_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(albums)
}

pub async fn list_albums_by_language(
    pool: &SqlitePool,
    language: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Album>> {
    let albums = sqlx::query_as::<_, Album>(
        r#"
        SELECT album_id, name, artist_id, album_lan, release_date,
               album_category, record_label, star, listen_date
        FROM albums
        WHERE album_lan = ?
        ORDER BY album_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(language)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(albums)
}

/// Insert an album and link it to `genre_ids`
///
/// The artist and every genre must already exist.
pub async fn create_album(pool: &SqlitePool, album: &AlbumCreate) -> Result<Album> {
    if get_album(pool, &album.album_id).await?.is_some() {
        return Err(Error::Duplicate("Album already registered".to_string()));
    }

    if get_artist(pool, &album.artist_id).await?.is_none() {
        return Err(Error::InvalidInput(format!(
            "Artist {} not found",
            album.artist_id
        )));
    }

    let missing = missing_genre_ids(pool, &album.genre_ids).await?;
    if let Some(id) = missing.first() {
        return Err(Error::InvalidInput(format!("Genre {} not found", id)));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO albums (album_id, name, artist_id, album_lan, release_date,
                            album_category, record_label, star, listen_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&album.album_id)
    .bind(&album.name)
    .bind(&album.artist_id)
    .bind(&album.album_lan)
    .bind(album.release_date)
    .bind(&album.album_category)
    .bind(&album.record_label)
    .bind(album.star)
    .bind(album.listen_date)
    .execute(&mut *tx)
    .await
    .map_err(|e| duplicate_or(e, "Album already registered"))?;

    for genre_id in &album.genre_ids {
        sqlx::query("INSERT OR IGNORE INTO album_genre_link (album_id, genre_id) VALUES (?, ?)")
            .bind(&album.album_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Album {
        album_id: album.album_id.clone(),
        name: album.name.clone(),
        artist_id: album.artist_id.clone(),
        album_lan: album.album_lan.clone(),
        release_date: album.release_date,
        album_category: album.album_category.clone(),
        record_label: album.record_label.clone(),
        star: album.star,
        listen_date: album.listen_date,
    })
}

pub async fn list_album_songs(
    pool: &SqlitePool,
    album_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Song>> {
    let songs = sqlx::query_as::<_, Song>(
        r#"
        SELECT song_id, name, star, album_id
        FROM songs
        WHERE album_id = ?
        ORDER BY song_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(album_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

pub async fn list_album_genres(pool: &SqlitePool, album_id: &str) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.id, g.name, g.info
        FROM genres g
        JOIN album_genre_link l ON l.genre_id = g.id
        WHERE l.album_id = ?
        ORDER BY g.id
        "#,
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;
    Ok(genres)
}
