//! Substring search over catalog names
//!
//! SQLite `LIKE` folds case for ASCII only. Each query is therefore matched
//! as typed, lowercased and uppercased, which covers names whose non-ASCII
//! letters share one case ("Björk" / "BJÖRK"). Mixed-case non-ASCII names
//! such as "BjÖrk" still need the exact casing.

use crate::db::models::{Album, Artist, Song};
use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Maximum rows returned per entity type
pub const SEARCH_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub songs: Vec<Song>,
}

/// Build a LIKE pattern matching `query` anywhere, with wildcards escaped
pub fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// LIKE patterns for `query` as typed, lowercased and uppercased
pub fn like_patterns(query: &str) -> [String; 3] {
    [
        like_pattern(query),
        like_pattern(&query.to_lowercase()),
        like_pattern(&query.to_uppercase()),
    ]
}

/// Case-insensitive substring match on artist names
pub async fn search_artists(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Artist>> {
    let [typed, lower, upper] = like_patterns(query);
    let artists = sqlx::query_as::<_, Artist>(
        r#"
        SELECT artist_id, name, reign FROM artists
        WHERE (name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\')
        ORDER BY name, artist_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(artists)
}

pub async fn search_albums(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Album>> {
    let [typed, lower, upper] = like_patterns(query);
    let albums = sqlx::query_as::<_, Album>(
        r#"
        SELECT album_id, name, artist_id, album_lan, release_date,
               album_category, record_label, star, listen_date
        FROM albums
        WHERE (name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\')
        ORDER BY name, album_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(albums)
}

pub async fn search_songs(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Song>> {
    let [typed, lower, upper] = like_patterns(query);
    let songs = sqlx::query_as::<_, Song>(
        r#"
        SELECT song_id, name, star, album_id FROM songs
        WHERE (name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\')
        ORDER BY name, song_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(songs)
}

/// Search artists, albums and songs by name
pub async fn search_all(pool: &SqlitePool, query: &str) -> Result<SearchResults> {
    Ok(SearchResults {
        artists: search_artists(pool, query, SEARCH_LIMIT).await?,
        albums: search_albums(pool, query, SEARCH_LIMIT).await?,
        songs: search_songs(pool, query, SEARCH_LIMIT).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("moon"), "%moon%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_like_patterns_fold_non_ascii() {
        let [typed, lower, upper] = like_patterns("Björk");
        assert_eq!(typed, "%Björk%");
        assert_eq!(lower, "%björk%");
        assert_eq!(upper, "%BJÖRK%");
    }
}
