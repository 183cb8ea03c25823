//! Named page queries
//!
//! Each function is one parameterized query named after the stored
//! procedure the old site called. Pages are assembled from several of
//! them; none of them write.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use xiamiu_common::db::models::Genre;
use xiamiu_common::db::search::{like_patterns, SEARCH_LIMIT};
use xiamiu_common::Result;

/// Most-liked comment shown on an entity page
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct HotComment {
    pub comment: String,
    pub review_date: NaiveDate,
    pub num_like: i64,
    pub user_name: String,
}

/// One row per genre of the artist; genre columns are null when it has none
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ArtistDetail {
    pub artist_name: String,
    pub reign: String,
    pub genre_id: Option<i64>,
    pub genre_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ArtistAlbumEntry {
    pub album_id: String,
    pub album_name: String,
    pub release_date: NaiveDate,
    pub album_category: String,
    pub star: i64,
}

/// One row per genre of the album
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AlbumDetail {
    pub album_name: String,
    pub artist_id: String,
    pub artist_name: String,
    pub album_lan: String,
    pub record_label: String,
    pub release_date: NaiveDate,
    pub album_category: String,
    pub genre_id: Option<i64>,
    pub genre_name: Option<String>,
    pub star: i64,
    pub listen_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AlbumSongEntry {
    pub song_id: String,
    pub song_name: String,
    pub star: i64,
}

/// One row per credited artist of the song
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SongDetail {
    pub song_id: String,
    pub song_name: String,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub album_id: String,
    pub album_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ArtistHit {
    pub pic_address: Option<String>,
    pub artist_id: String,
    pub artist_name: String,
    pub reign: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AlbumHit {
    pub pic_address: Option<String>,
    pub album_id: String,
    pub album_name: String,
    pub artist_id: String,
    pub artist_name: String,
    pub star: i64,
    pub release_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SongHit {
    pub pic_address: Option<String>,
    pub song_id: String,
    pub song_name: String,
    pub album_id: String,
    pub album_name: String,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
}

// ========================================
// Artist page
// ========================================

pub async fn show_artist_pic(pool: &SqlitePool, artist_id: &str) -> Result<Option<String>> {
    let pic = sqlx::query_scalar::<_, String>(
        "SELECT pic_address FROM artist_meta WHERE artist_id = ?",
    )
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;
    Ok(pic)
}

pub async fn show_artist_info(pool: &SqlitePool, artist_id: &str) -> Result<Option<String>> {
    let info = sqlx::query_scalar::<_, String>("SELECT info FROM artist_meta WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_optional(pool)
        .await?;
    Ok(info)
}

/// Empty when the artist does not exist
pub async fn show_artist_details(pool: &SqlitePool, artist_id: &str) -> Result<Vec<ArtistDetail>> {
    let rows = sqlx::query_as::<_, ArtistDetail>(
        r#"
        SELECT a.name AS artist_name, a.reign AS reign,
               g.id AS genre_id, g.name AS genre_name
        FROM artists a
        LEFT JOIN artist_genre_link l ON l.artist_id = a.artist_id
        LEFT JOIN genres g ON g.id = l.genre_id
        WHERE a.artist_id = ?
        ORDER BY g.id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn show_artist_cmt(pool: &SqlitePool, artist_id: &str) -> Result<Option<HotComment>> {
    let comment = sqlx::query_as::<_, HotComment>(
        r#"
        SELECT c.comment, c.review_date, c.num_like, u.user_name
        FROM artist_comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.artist_id = ?
        ORDER BY c.num_like DESC, c.created DESC, c.id DESC
        LIMIT 1
        "#,
    )
    .bind(artist_id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

/// Newest release first
pub async fn show_artist_albumlist(
    pool: &SqlitePool,
    artist_id: &str,
) -> Result<Vec<ArtistAlbumEntry>> {
    let rows = sqlx::query_as::<_, ArtistAlbumEntry>(
        r#"
        SELECT album_id, name AS album_name, release_date, album_category, star
        FROM albums
        WHERE artist_id = ?
        ORDER BY release_date DESC, album_id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ========================================
// Album page
// ========================================

pub async fn show_album_pic(pool: &SqlitePool, album_id: &str) -> Result<Option<String>> {
    let pic = sqlx::query_scalar::<_, String>(
        "SELECT pic_address FROM album_meta WHERE album_id = ?",
    )
    .bind(album_id)
    .fetch_optional(pool)
    .await?;
    Ok(pic)
}

pub async fn show_album_info(pool: &SqlitePool, album_id: &str) -> Result<Option<String>> {
    let info = sqlx::query_scalar::<_, String>("SELECT info FROM album_meta WHERE album_id = ?")
        .bind(album_id)
        .fetch_optional(pool)
        .await?;
    Ok(info)
}

/// Empty when the album does not exist
pub async fn show_album_details(pool: &SqlitePool, album_id: &str) -> Result<Vec<AlbumDetail>> {
    let rows = sqlx::query_as::<_, AlbumDetail>(
        r#"
        SELECT al.name AS album_name, al.artist_id AS artist_id, ar.name AS artist_name,
               al.album_lan AS album_lan, al.record_label AS record_label,
               al.release_date AS release_date, al.album_category AS album_category,
               g.id AS genre_id, g.name AS genre_name,
               al.star AS star, al.listen_date AS listen_date
        FROM albums al
        JOIN artists ar ON ar.artist_id = al.artist_id
        LEFT JOIN album_genre_link l ON l.album_id = al.album_id
        LEFT JOIN genres g ON g.id = l.genre_id
        WHERE al.album_id = ?
        ORDER BY g.id
        "#,
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn show_album_cmt(pool: &SqlitePool, album_id: &str) -> Result<Option<HotComment>> {
    let comment = sqlx::query_as::<_, HotComment>(
        r#"
        SELECT c.comment, c.review_date, c.num_like, u.user_name
        FROM album_comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.album_id = ?
        ORDER BY c.num_like DESC, c.created DESC, c.id DESC
        LIMIT 1
        "#,
    )
    .bind(album_id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

pub async fn show_album_songlist(pool: &SqlitePool, album_id: &str) -> Result<Vec<AlbumSongEntry>> {
    let rows = sqlx::query_as::<_, AlbumSongEntry>(
        r#"
        SELECT song_id, name AS song_name, star
        FROM songs
        WHERE album_id = ?
        ORDER BY song_id
        "#,
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ========================================
// Song page
// ========================================

/// A song has no picture of its own; this is its album's cover
pub async fn show_song_pic(pool: &SqlitePool, song_id: &str) -> Result<Option<String>> {
    let pic = sqlx::query_scalar::<_, String>(
        r#"
        SELECT m.pic_address
        FROM songs s
        JOIN album_meta m ON m.album_id = s.album_id
        WHERE s.song_id = ?
        "#,
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;
    Ok(pic)
}

pub async fn show_song_lyrics(pool: &SqlitePool, song_id: &str) -> Result<Option<String>> {
    let lyrics = sqlx::query_scalar::<_, String>("SELECT lyrics FROM song_meta WHERE song_id = ?")
        .bind(song_id)
        .fetch_optional(pool)
        .await?;
    Ok(lyrics)
}

/// Empty when the song does not exist
pub async fn show_song_details(pool: &SqlitePool, song_id: &str) -> Result<Vec<SongDetail>> {
    let rows = sqlx::query_as::<_, SongDetail>(
        r#"
        SELECT s.song_id AS song_id, s.name AS song_name,
               ar.artist_id AS artist_id, ar.name AS artist_name,
               s.album_id AS album_id, al.name AS album_name
        FROM songs s
        JOIN albums al ON al.album_id = s.album_id
        LEFT JOIN song_artist_link l ON l.song_id = s.song_id
        LEFT JOIN artists ar ON ar.artist_id = l.artist_id
        WHERE s.song_id = ?
        ORDER BY ar.artist_id
        "#,
    )
    .bind(song_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn show_song_cmt(pool: &SqlitePool, song_id: &str) -> Result<Option<HotComment>> {
    let comment = sqlx::query_as::<_, HotComment>(
        r#"
        SELECT c.comment, c.review_date, c.num_like, u.user_name
        FROM song_comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.song_id = ?
        ORDER BY c.num_like DESC, c.created DESC, c.id DESC
        LIMIT 1
        "#,
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

// ========================================
// Genre page
// ========================================

pub async fn show_genre(pool: &SqlitePool, genre_id: i64) -> Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>("SELECT id, name, info FROM genres WHERE id = ?")
        .bind(genre_id)
        .fetch_optional(pool)
        .await?;
    Ok(genre)
}

// ========================================
// Search
// ========================================

pub async fn search_artist_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<ArtistHit>> {
    let [typed, lower, upper] = like_patterns(name);
    let rows = sqlx::query_as::<_, ArtistHit>(
        r#"
        SELECT m.pic_address AS pic_address, a.artist_id AS artist_id,
               a.name AS artist_name, a.reign AS reign
        FROM artists a
        LEFT JOIN artist_meta m ON m.artist_id = a.artist_id
        WHERE (a.name LIKE ? ESCAPE '\' OR a.name LIKE ? ESCAPE '\' OR a.name LIKE ? ESCAPE '\')
        ORDER BY a.name, a.artist_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn search_album_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<AlbumHit>> {
    let [typed, lower, upper] = like_patterns(name);
    let rows = sqlx::query_as::<_, AlbumHit>(
        r#"
        SELECT m.pic_address AS pic_address, al.album_id AS album_id,
               al.name AS album_name, al.artist_id AS artist_id,
               ar.name AS artist_name, al.star AS star, al.release_date AS release_date
        FROM albums al
        JOIN artists ar ON ar.artist_id = al.artist_id
        LEFT JOIN album_meta m ON m.album_id = al.album_id
        WHERE (al.name LIKE ? ESCAPE '\' OR al.name LIKE ? ESCAPE '\' OR al.name LIKE ? ESCAPE '\')
        ORDER BY al.name, al.album_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// One hit per (song, credited artist) pair
pub async fn search_song_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<SongHit>> {
    let [typed, lower, upper] = like_patterns(name);
    let rows = sqlx::query_as::<_, SongHit>(
        r#"
        SELECT m.pic_address AS pic_address, s.song_id AS song_id, s.name AS song_name,
               s.album_id AS album_id, al.name AS album_name,
               ar.artist_id AS artist_id, ar.name AS artist_name
        FROM songs s
        JOIN albums al ON al.album_id = s.album_id
        LEFT JOIN album_meta m ON m.album_id = s.album_id
        LEFT JOIN song_artist_link l ON l.song_id = s.song_id
        LEFT JOIN artists ar ON ar.artist_id = l.artist_id
        WHERE (s.name LIKE ? ESCAPE '\' OR s.name LIKE ? ESCAPE '\' OR s.name LIKE ? ESCAPE '\')
        ORDER BY s.name, s.song_id, ar.artist_id
        LIMIT ?
        "#,
    )
    .bind(&typed)
    .bind(&lower)
    .bind(&upper)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiamiu_common::db::init_memory_database;

    async fn fixture() -> SqlitePool {
        let pool = init_memory_database().await.unwrap();
        for sql in [
            "INSERT INTO genres (id, name, info) VALUES (1, 'Pop', 'popular'), (2, 'R&B', '')",
            "INSERT INTO artists (artist_id, name, reign) VALUES ('a1', '周杰伦', '华语'), ('a2', '方文山', '华语')",
            "INSERT INTO artist_genre_link (artist_id, genre_id) VALUES ('a1', 1), ('a1', 2)",
            "INSERT INTO albums (album_id, name, artist_id, album_lan, release_date, album_category, record_label, star) \
             VALUES ('al1', '范特西', 'a1', '国语', '2001-09-14', '录音室专辑', '阿尔发', 95), \
                    ('al2', '八度空间', 'a1', '国语', '2002-07-18', '录音室专辑', '阿尔发', 88)",
            "INSERT INTO album_meta (album_id, info, pic_address) VALUES ('al1', '第二张专辑', 'http://img/al1.jpg')",
            "INSERT INTO songs (song_id, name, star, album_id) VALUES ('s1', '双截棍', 5, 'al1'), ('s2', '简单爱', 4, 'al1')",
            "INSERT INTO song_artist_link (song_id, artist_id) VALUES ('s1', 'a1'), ('s1', 'a2')",
            "INSERT INTO users (id, user_name, password_hash, password_salt) VALUES (1, 'alice', 'h', 's'), (2, 'bob', 'h', 's')",
            "INSERT INTO song_comments (song_id, user_id, comment, star, num_like) VALUES ('s1', 1, '一般', 3, 1), ('s1', 2, '神曲', 5, 9)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_artist_details_one_row_per_genre() {
        let pool = fixture().await;

        let rows = show_artist_details(&pool, "a1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].genre_name.as_deref(), Some("R&B"));

        // An artist without genres still yields one row
        let rows = show_artist_details(&pool, "a2").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].genre_id.is_none());

        assert!(show_artist_details(&pool, "zz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_artist_albumlist_newest_first() {
        let pool = fixture().await;
        let albums = show_artist_albumlist(&pool, "a1").await.unwrap();
        let ids: Vec<_> = albums.iter().map(|a| a.album_id.as_str()).collect();
        assert_eq!(ids, vec!["al2", "al1"]);
    }

    #[tokio::test]
    async fn test_hot_comment_is_most_liked() {
        let pool = fixture().await;
        let hot = show_song_cmt(&pool, "s1").await.unwrap().unwrap();
        assert_eq!(hot.comment, "神曲");
        assert_eq!(hot.user_name, "bob");
        assert!(show_song_cmt(&pool, "s2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_song_pic_comes_from_album() {
        let pool = fixture().await;
        assert_eq!(
            show_song_pic(&pool, "s1").await.unwrap().as_deref(),
            Some("http://img/al1.jpg")
        );
        assert!(show_song_lyrics(&pool, "s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_song_search_lists_each_artist() {
        let pool = fixture().await;

        let hits = search_song_by_name(&pool, "双截").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].album_name, "范特西");

        // Songs without credited artists still match
        let hits = search_song_by_name(&pool, "简单").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].artist_id.is_none());
    }

    #[tokio::test]
    async fn test_album_search_joins_artist() {
        let pool = fixture().await;
        let hits = search_album_by_name(&pool, "空间").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].artist_name, "周杰伦");
        assert!(hits[0].pic_address.is_none());
    }
}
