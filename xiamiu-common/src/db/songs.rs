//! Song queries

use crate::db::albums::get_album;
use crate::db::artists::get_artist;
use crate::db::duplicate_or;
use crate::db::models::{Artist, Song, SongCreate};
use crate::{Error, Result};
use sqlx::SqlitePool;

pub async fn get_song(pool: &SqlitePool, song_id: &str) -> Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>(
        "SELECT song_id, name, star, album_id FROM songs WHERE song_id = ?",
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;
    Ok(song)
}

pub async fn list_songs(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Song>> {
    let songs = sqlx::query_as::<_, Song>(
        "SELECT song_id, name, star, album_id FROM songs ORDER BY song_id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

/// Insert a song and credit it to `artist_ids`
///
/// The album and every credited artist must already exist.
pub async fn create_song(pool: &SqlitePool, song: &SongCreate) -> Result<Song> {
    if get_song(pool, &song.song_id).await?.is_some() {
        return Err(Error::Duplicate("Song already registered".to_string()));
    }

    if get_album(pool, &song.album_id).await?.is_none() {
        return Err(Error::InvalidInput(format!("Album {} not found", song.album_id)));
    }

    for artist_id in &song.artist_ids {
        if get_artist(pool, artist_id).await?.is_none() {
            return Err(Error::InvalidInput(format!("Artist {} not found", artist_id)));
        }
    }

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO songs (song_id, name, star, album_id) VALUES (?, ?, ?, ?)")
        .bind(&song.song_id)
        .bind(&song.name)
        .bind(song.star)
        .bind(&song.album_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_or(e, "Song already registered"))?;

    for artist_id in &song.artist_ids {
        sqlx::query("INSERT OR IGNORE INTO song_artist_link (song_id, artist_id) VALUES (?, ?)")
            .bind(&song.song_id)
            .bind(artist_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Song {
        song_id: song.song_id.clone(),
        name: song.name.clone(),
        star: song.star,
        album_id: song.album_id.clone(),
    })
}

pub async fn list_song_artists(pool: &SqlitePool, song_id: &str) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(
        r#"
        SELECT a.artist_id, a.name, a.reign
        FROM artists a
        JOIN song_artist_link l ON l.artist_id = a.artist_id
        WHERE l.song_id = ?
        ORDER BY a.artist_id
        "#,
    )
    .bind(song_id)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}
