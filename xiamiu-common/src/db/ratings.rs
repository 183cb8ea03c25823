//! Rating aggregation queries

use crate::rating::{album_rating, song_rating, AlbumRating, SongRating};
use crate::Result;
use sqlx::SqlitePool;

/// Average of the song's comment stars
pub async fn get_song_rating(pool: &SqlitePool, song_id: &str) -> Result<SongRating> {
    let (count, mean): (i64, Option<f64>) = sqlx::query_as(
        "SELECT COUNT(star), AVG(star) FROM song_comments WHERE song_id = ?",
    )
    .bind(song_id)
    .fetch_one(pool)
    .await?;
    Ok(song_rating(count, mean))
}

/// Average of the album's comment stars
pub async fn get_album_rating(pool: &SqlitePool, album_id: &str) -> Result<AlbumRating> {
    let (count, mean): (i64, Option<f64>) = sqlx::query_as(
        "SELECT COUNT(star), AVG(star) FROM album_comments WHERE album_id = ?",
    )
    .bind(album_id)
    .fetch_one(pool)
    .await?;
    Ok(album_rating(count, mean))
}

/// Average of every song-comment star across the album's songs
pub async fn get_album_songs_rating(pool: &SqlitePool, album_id: &str) -> Result<SongRating> {
    let (count, mean): (i64, Option<f64>) = sqlx::query_as(
        r#"
        SELECT COUNT(c.star), AVG(c.star)
        FROM song_comments c
        JOIN songs s ON s.song_id = c.song_id
        WHERE s.album_id = ?
        "#,
    )
    .bind(album_id)
    .fetch_one(pool)
    .await?;
    Ok(song_rating(count, mean))
}
