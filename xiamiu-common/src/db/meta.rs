//! One-to-one meta side tables
//!
//! Each entity has at most one meta row. Creating meta for a missing entity
//! is `NotFound`; creating it twice is `Duplicate`.

use crate::db::albums::get_album;
use crate::db::artists::get_artist;
use crate::db::duplicate_or;
use crate::db::models::{AlbumMeta, ArtistMeta, InfoMetaCreate, SongMeta, SongMetaCreate};
use crate::db::songs::get_song;
use crate::{Error, Result};
use sqlx::SqlitePool;

pub async fn get_song_meta(pool: &SqlitePool, song_id: &str) -> Result<Option<SongMeta>> {
    let meta = sqlx::query_as::<_, SongMeta>(
        "SELECT song_id, lyrics FROM song_meta WHERE song_id = ?",
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;
    Ok(meta)
}

pub async fn create_song_meta(
    pool: &SqlitePool,
    song_id: &str,
    meta: &SongMetaCreate,
) -> Result<SongMeta> {
    if get_song(pool, song_id).await?.is_none() {
        return Err(Error::NotFound("Song".to_string()));
    }
    if get_song_meta(pool, song_id).await?.is_some() {
        return Err(Error::Duplicate("Song meta already exists".to_string()));
    }

    sqlx::query("INSERT INTO song_meta (song_id, lyrics) VALUES (?, ?)")
        .bind(song_id)
        .bind(&meta.lyrics)
        .execute(pool)
        .await
        .map_err(|e| duplicate_or(e, "Song meta already exists"))?;

    Ok(SongMeta {
        song_id: song_id.to_string(),
        lyrics: meta.lyrics.clone(),
    })
}

pub async fn get_artist_meta(pool: &SqlitePool, artist_id: &str) -> Result<Option<ArtistMeta>> {
    let meta = sqlx::query_as::<_, ArtistMeta>(
        "SELECT artist_id, info, pic_address FROM artist_meta WHERE artist_id = ?",
    )
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;
    Ok(meta)
}

pub async fn create_artist_meta(
    pool: &SqlitePool,
    artist_id: &str,
    meta: &InfoMetaCreate,
) -> Result<ArtistMeta> {
    if get_artist(pool, artist_id).await?.is_none() {
        return Err(Error::NotFound("Artist".to_string()));
    }
    if get_artist_meta(pool, artist_id).await?.is_some() {
        return Err(Error::Duplicate("Artist meta already exists".to_string()));
    }

    sqlx::query("INSERT INTO artist_meta (artist_id, info, pic_address) VALUES (?, ?, ?)")
        .bind(artist_id)
        .bind(&meta.info)
        .bind(&meta.pic_address)
        .execute(pool)
        .await
        .map_err(|e| duplicate_or(e, "Artist meta already exists"))?;

    Ok(ArtistMeta {
        artist_id: artist_id.to_string(),
        info: meta.info.clone(),
        pic_address: meta.pic_address.clone(),
    })
}

pub async fn get_album_meta(pool: &SqlitePool, album_id: &str) -> Result<Option<AlbumMeta>> {
    let meta = sqlx::query_as::<_, AlbumMeta>(
        "SELECT album_id, info, pic_address FROM album_meta WHERE album_id = ?",
    )
    .bind(album_id)
    .fetch_optional(pool)
    .await?;
    Ok(meta)
}

pub async fn create_album_meta(
    pool: &SqlitePool,
    album_id: &str,
    meta: &InfoMetaCreate,
) -> Result<AlbumMeta> {
    if get_album(pool, album_id).await?.is_none() {
        return Err(Error::NotFound("Album".to_string()));
    }
    if get_album_meta(pool, album_id).await?.is_some() {
        return Err(Error::Duplicate("Album meta already exists".to_string()));
    }

    sqlx::query("INSERT INTO album_meta (album_id, info, pic_address) VALUES (?, ?, ?)")
        .bind(album_id)
        .bind(&meta.info)
        .bind(&meta.pic_address)
        .execute(pool)
        .await
        .map_err(|e| duplicate_or(e, "Album meta already exists"))?;

    Ok(AlbumMeta {
        album_id: album_id.to_string(),
        info: meta.info.clone(),
        pic_address: meta.pic_address.clone(),
    })
}
