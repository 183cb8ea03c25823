//! Artist queries

use crate::db::duplicate_or;
use crate::db::genres::missing_genre_ids;
use crate::db::models::{Album, Artist, ArtistCreate, Genre, Song};
use crate::{Error, Result};
use sqlx::SqlitePool;

pub async fn get_artist(pool: &SqlitePool, artist_id: &str) -> Result<Option<Artist>> {
    let artist = sqlx::query_as::<_, Artist>(
        "SELECT artist_id, name, reign FROM artists WHERE artist_id = ?",
    )
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;
    Ok(artist)
}

pub async fn list_artists(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(
        "SELECT artist_id, name, reign FROM artists ORDER BY artist_id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

/// Artists whose region matches exactly
pub async fn list_artists_by_reign(
    pool: &SqlitePool,
    reign: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Artist>> {
    let artists = sqlx::query_as::<_, Artist>(
        r#"
        SELECT artist_id, name, reign FROM artists
        WHERE reign = ?
        ORDER BY artist_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(reign)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

/// Insert an artist and link it to `genre_ids`
///
/// Fails with `Duplicate` if the key is taken and `InvalidInput` if a genre
/// does not exist. Nothing is written on failure.
pub async fn create_artist(pool: &SqlitePool, artist: &ArtistCreate) -> Result<Artist> {
    if get_artist(pool, &artist.artist_id).await?.is_some() {
        return Err(Error::Duplicate("Artist already registered".to_string()));
    }

    let missing = missing_genre_ids(pool, &artist.genre_ids).await?;
    if let Some(id) = missing.first() {
        return Err(Error::InvalidInput(format!("Genre {} not found", id)));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO artists (artist_id, name, reign) VALUES (?, ?, ?)")
        .bind(&artist.artist_id)
        .bind(&artist.name)
        .bind(&artist.reign)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_or(e, "Artist already registered"))?;

    for genre_id in &artist.genre_ids {
        sqlx::query("INSERT OR IGNORE INTO artist_genre_link (artist_id, genre_id) VALUES (?, ?)")
            .bind(&artist.artist_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Artist {
        artist_id: artist.artist_id.clone(),
        name: artist.name.clone(),
        reign: artist.reign.clone(),
    })
}

pub async fn list_artist_albums(
    pool: &SqlitePool,
    artist_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Album>> {
    let albums = sqlx::query_as::<_, Album>(
        r#"
        SELECT album_id, name, artist_id, album_lan, release_date,
               album_category, record_label, star, listen_date
        FROM albums
        WHERE artist_id = ?
        ORDER BY release_date, album_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(artist_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(albums)
}

/// Songs credited to the artist through `song_artist_link`
pub async fn list_artist_songs(
    pool: &SqlitePool,
    artist_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Song>> {
    let songs = sqlx::query_as::<_, Song>(
        r#"
        SELECT s.song_id, s.name, s.star, s.album_id
        FROM songs s
        JOIN song_artist_link l ON l.song_id = s.song_id
        WHERE l.artist_id = ?
        ORDER BY s.song_id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(artist_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

pub async fn list_artist_genres(pool: &SqlitePool, artist_id: &str) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.id, g.name, g.info
        FROM genres g
        JOIN artist_genre_link l ON l.genre_id = g.id
        WHERE l.artist_id = ?
        ORDER BY g.id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::genres::create_genre;
    use crate::db::init::init_memory_database;
    use crate::db::models::GenreCreate;

    fn artist(id: &str, reign: &str, genre_ids: Vec<i64>) -> ArtistCreate {
        ArtistCreate {
            artist_id: id.to_string(),
            name: format!("Artist {}", id),
            reign: reign.to_string(),
            genre_ids,
        }
    }

    #[tokio::test]
    async fn test_create_artist_with_genres() {
        let pool = init_memory_database().await.unwrap();
        let genre = create_genre(
            &pool,
            &GenreCreate {
                name: "Pop".to_string(),
                info: String::new(),
            },
        )
        .await
        .unwrap();

        create_artist(&pool, &artist("a1", "Taiwan", vec![genre.id]))
            .await
            .unwrap();

        let genres = list_artist_genres(&pool, "a1").await.unwrap();
        assert_eq!(genres, vec![genre]);
    }

    #[tokio::test]
    async fn test_create_artist_unknown_genre_writes_nothing() {
        let pool = init_memory_database().await.unwrap();

        let err = create_artist(&pool, &artist("a1", "Taiwan", vec![42]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(get_artist(&pool, "a1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_artist_rejected() {
        let pool = init_memory_database().await.unwrap();
        create_artist(&pool, &artist("a1", "Taiwan", vec![])).await.unwrap();

        let err = create_artist(&pool, &artist("a1", "Japan", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_list_artists_by_reign() {
        let pool = init_memory_database().await.unwrap();
        create_artist(&pool, &artist("a1", "Taiwan", vec![])).await.unwrap();
        create_artist(&pool, &artist("a2", "Japan", vec![])).await.unwrap();
        create_artist(&pool, &artist("a3", "Taiwan", vec![])).await.unwrap();

        let taiwan = list_artists_by_reign(&pool, "Taiwan", 0, 100).await.unwrap();
        let ids: Vec<_> = taiwan.iter().map(|a| a.artist_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
    }
}
