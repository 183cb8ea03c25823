//! Seed data import and export
//!
//! A seed file is one JSON object with an array per table. Import is an
//! idempotent upsert keyed on each table's primary key, applied in
//! dependency order inside a single transaction. Export writes the same
//! shape, so `dump` followed by `load` reproduces a database.

use crate::auth::hash_password;
use crate::db::comments::list_all_comments;
use crate::db::models::{
    Album, AlbumComment, AlbumGenreLink, AlbumMeta, Artist, ArtistComment, ArtistGenreLink,
    ArtistMeta, Genre, Song, SongArtistLink, SongComment, SongMeta, UserRecord,
};
use crate::db::users::list_user_records;
use crate::time::today;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;
use tracing::info;

/// Contents of a seed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub song_meta: Vec<SongMeta>,
    #[serde(default)]
    pub artist_meta: Vec<ArtistMeta>,
    #[serde(default)]
    pub album_meta: Vec<AlbumMeta>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub artist_genres: Vec<ArtistGenreLink>,
    #[serde(default)]
    pub album_genres: Vec<AlbumGenreLink>,
    #[serde(default)]
    pub song_artists: Vec<SongArtistLink>,
    #[serde(default)]
    pub song_comments: Vec<SeedSongComment>,
    #[serde(default)]
    pub album_comments: Vec<SeedAlbumComment>,
    #[serde(default)]
    pub artist_comments: Vec<SeedArtistComment>,
}

/// User entry in a seed file
///
/// Either `password` (hashed on import) or `password_hash` plus
/// `password_salt` (as written by export) must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: i64,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_salt: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub constellation: String,
    #[serde(default)]
    pub play_count: i64,
    #[serde(default)]
    pub join_time: Option<NaiveDate>,
}

impl SeedUser {
    fn into_record(self) -> Result<UserRecord> {
        let (password_hash, password_salt) = match (self.password_hash, self.password_salt) {
            (Some(hash), Some(salt)) => (hash, salt),
            _ => {
                let password = self.password.ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "seed user {} needs password or password_hash/password_salt",
                        self.user_name
                    ))
                })?;
                let hashed = hash_password(&password);
                (hashed.hash, hashed.salt)
            }
        };

        Ok(UserRecord {
            id: self.id,
            user_name: self.user_name,
            password_hash,
            password_salt,
            location: self.location,
            age: self.age,
            gender: self.gender,
            constellation: self.constellation,
            play_count: self.play_count,
            join_time: self.join_time.unwrap_or_else(today),
        })
    }
}

impl From<UserRecord> for SeedUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            user_name: record.user_name,
            password: None,
            password_hash: Some(record.password_hash),
            password_salt: Some(record.password_salt),
            location: record.location,
            age: record.age,
            gender: record.gender,
            constellation: record.constellation,
            play_count: record.play_count,
            join_time: Some(record.join_time),
        }
    }
}

/// Song comment entry in a seed file
///
/// `num_like`, `review_date`, `created` and `modified` may be omitted;
/// the table defaults fill them in on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSongComment {
    pub id: i64,
    pub song_id: String,
    pub user_id: i64,
    pub comment: String,
    pub star: i64,
    #[serde(default)]
    pub num_like: i64,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
}

impl From<SongComment> for SeedSongComment {
    fn from(c: SongComment) -> Self {
        Self {
            id: c.id,
            song_id: c.song_id,
            user_id: c.user_id,
            comment: c.comment,
            star: c.star,
            num_like: c.num_like,
            review_date: Some(c.review_date),
            created: Some(c.created),
            modified: Some(c.modified),
        }
    }
}

/// Album comment entry in a seed file (same defaults as songs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedAlbumComment {
    pub id: i64,
    pub album_id: String,
    pub user_id: i64,
    pub comment: String,
    pub star: i64,
    #[serde(default)]
    pub num_like: i64,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
}

impl From<AlbumComment> for SeedAlbumComment {
    fn from(c: AlbumComment) -> Self {
        Self {
            id: c.id,
            album_id: c.album_id,
            user_id: c.user_id,
            comment: c.comment,
            star: c.star,
            num_like: c.num_like,
            review_date: Some(c.review_date),
            created: Some(c.created),
            modified: Some(c.modified),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedArtistComment {
    pub id: i64,
    pub artist_id: String,
    pub user_id: i64,
    pub comment: String,
    #[serde(default)]
    pub num_like: i64,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
}

impl From<ArtistComment> for SeedArtistComment {
    fn from(c: ArtistComment) -> Self {
        Self {
            id: c.id,
            artist_id: c.artist_id,
            user_id: c.user_id,
            comment: c.comment,
            num_like: c.num_like,
            review_date: Some(c.review_date),
            created: Some(c.created),
            modified: Some(c.modified),
        }
    }
}

/// Row counts written by [`import`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub catalog_rows: usize,
    pub users: usize,
    pub links: usize,
    pub comments: usize,
}

impl SeedData {
    fn summary(&self) -> SeedSummary {
        SeedSummary {
            catalog_rows: self.genres.len()
                + self.artists.len()
                + self.albums.len()
                + self.songs.len()
                + self.song_meta.len()
                + self.artist_meta.len()
                + self.album_meta.len(),
            users: self.users.len(),
            links: self.artist_genres.len() + self.album_genres.len() + self.song_artists.len(),
            comments: self.song_comments.len()
                + self.album_comments.len()
                + self.artist_comments.len(),
        }
    }
}

/// Read and parse a seed file
pub fn read_seed_file(path: &Path) -> Result<SeedData> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a seed file as pretty JSON
pub fn write_seed_file(path: &Path, data: &SeedData) -> Result<()> {
    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Upsert every row of `data`; all or nothing
pub async fn import(pool: &SqlitePool, data: SeedData) -> Result<SeedSummary> {
    let summary = data.summary();
    let mut tx = pool.begin().await?;

    for genre in &data.genres {
        upsert_genre(&mut tx, genre).await?;
    }
    for artist in &data.artists {
        upsert_artist(&mut tx, artist).await?;
    }
    for album in &data.albums {
        upsert_album(&mut tx, album).await?;
    }
    for song in &data.songs {
        upsert_song(&mut tx, song).await?;
    }
    for meta in &data.song_meta {
        sqlx::query(
            "INSERT INTO song_meta (song_id, lyrics) VALUES (?, ?)
             ON CONFLICT(song_id) DO UPDATE SET lyrics = excluded.lyrics",
        )
        .bind(&meta.song_id)
        .bind(&meta.lyrics)
        .execute(&mut *tx)
        .await?;
    }
    for meta in &data.artist_meta {
        sqlx::query(
            "INSERT INTO artist_meta (artist_id, info, pic_address) VALUES (?, ?, ?)
             ON CONFLICT(artist_id) DO UPDATE SET info = excluded.info, pic_address = excluded.pic_address",
        )
        .bind(&meta.artist_id)
        .bind(&meta.info)
        .bind(&meta.pic_address)
        .execute(&mut *tx)
        .await?;
    }
    for meta in &data.album_meta {
        sqlx::query(
            "INSERT INTO album_meta (album_id, info, pic_address) VALUES (?, ?, ?)
             ON CONFLICT(album_id) DO UPDATE SET info = excluded.info, pic_address = excluded.pic_address",
        )
        .bind(&meta.album_id)
        .bind(&meta.info)
        .bind(&meta.pic_address)
        .execute(&mut *tx)
        .await?;
    }
    for user in data.users {
        upsert_user(&mut tx, &user.into_record()?).await?;
    }
    for link in &data.artist_genres {
        sqlx::query("INSERT OR IGNORE INTO artist_genre_link (artist_id, genre_id) VALUES (?, ?)")
            .bind(&link.artist_id)
            .bind(link.genre_id)
            .execute(&mut *tx)
            .await?;
    }
    for link in &data.album_genres {
        sqlx::query("INSERT OR IGNORE INTO album_genre_link (album_id, genre_id) VALUES (?, ?)")
            .bind(&link.album_id)
            .bind(link.genre_id)
            .execute(&mut *tx)
            .await?;
    }
    for link in &data.song_artists {
        sqlx::query("INSERT OR IGNORE INTO song_artist_link (song_id, artist_id) VALUES (?, ?)")
            .bind(&link.song_id)
            .bind(&link.artist_id)
            .execute(&mut *tx)
            .await?;
    }
    for c in &data.song_comments {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO song_comments
                (id, song_id, user_id, comment, star, num_like, review_date, created, modified)
            VALUES (?, ?, ?, ?, ?, ?, COALESCE(?, CURRENT_DATE),
                    COALESCE(?, CURRENT_TIMESTAMP), COALESCE(?, CURRENT_TIMESTAMP))
            "#,
        )
        .bind(c.id)
        .bind(&c.song_id)
        .bind(c.user_id)
        .bind(&c.comment)
        .bind(c.star)
        .bind(c.num_like)
        .bind(c.review_date)
        .bind(c.created)
        .bind(c.modified)
        .execute(&mut *tx)
        .await?;
    }
    for c in &data.album_comments {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO album_comments
                (id, album_id, user_id, comment, star, num_like, review_date, created, modified)
            VALUES (?, ?, ?, ?, ?, ?, COALESCE(?, CURRENT_DATE),
                    COALESCE(?, CURRENT_TIMESTAMP), COALESCE(?, CURRENT_TIMESTAMP))
            "#,
        )
        .bind(c.id)
        .bind(&c.album_id)
        .bind(c.user_id)
        .bind(&c.comment)
        .bind(c.star)
        .bind(c.num_like)
        .bind(c.review_date)
        .bind(c.created)
        .bind(c.modified)
        .execute(&mut *tx)
        .await?;
    }
    for c in &data.artist_comments {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO artist_comments
                (id, artist_id, user_id, comment, num_like, review_date, created, modified)
            VALUES (?, ?, ?, ?, ?, COALESCE(?, CURRENT_DATE),
                    COALESCE(?, CURRENT_TIMESTAMP), COALESCE(?, CURRENT_TIMESTAMP))
            "#,
        )
        .bind(c.id)
        .bind(&c.artist_id)
        .bind(c.user_id)
        .bind(&c.comment)
        .bind(c.num_like)
        .bind(c.review_date)
        .bind(c.created)
        .bind(c.modified)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Seed import complete: {} catalog rows, {} users, {} links, {} comments",
        summary.catalog_rows, summary.users, summary.links, summary.comments
    );
    Ok(summary)
}

async fn upsert_genre(conn: &mut SqliteConnection, genre: &Genre) -> Result<()> {
    sqlx::query(
        "INSERT INTO genres (id, name, info) VALUES (?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, info = excluded.info",
    )
    .bind(genre.id)
    .bind(&genre.name)
    .bind(&genre.info)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_artist(conn: &mut SqliteConnection, artist: &Artist) -> Result<()> {
    sqlx::query(
        "INSERT INTO artists (artist_id, name, reign) VALUES (?, ?, ?)
         ON CONFLICT(artist_id) DO UPDATE SET name = excluded.name, reign = excluded.reign",
    )
    .bind(&artist.artist_id)
    .bind(&artist.name)
    .bind(&artist.reign)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_album(conn: &mut SqliteConnection, album: &Album) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO albums (album_id, name, artist_id, album_lan, release_date,
                            album_category, record_label, star, listen_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(album_id) DO UPDATE SET
            name = excluded.name,
            artist_id = excluded.artist_id,
            album_lan = excluded.album_lan,
            release_date = excluded.release_date,
            album_category = excluded.album_category,
            record_label = excluded.record_label,
            star = excluded.star,
            listen_date = excluded.listen_date
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
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_song(conn: &mut SqliteConnection, song: &Song) -> Result<()> {
    sqlx::query(
        "INSERT INTO songs (song_id, name, star, album_id) VALUES (?, ?, ?, ?)
         ON CONFLICT(song_id) DO UPDATE SET
            name = excluded.name, star = excluded.star, album_id = excluded.album_id",
    )
    .bind(&song.song_id)
    .bind(&song.name)
    .bind(song.star)
    .bind(&song.album_id)
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_user(conn: &mut SqliteConnection, record: &UserRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, user_name, password_hash, password_salt, location, age,
                           gender, constellation, play_count, join_time)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            user_name = excluded.user_name,
            password_hash = excluded.password_hash,
            password_salt = excluded.password_salt,
            location = excluded.location,
            age = excluded.age,
            gender = excluded.gender,
            constellation = excluded.constellation,
            play_count = excluded.play_count,
            join_time = excluded.join_time
        "#,
    )
    .bind(record.id)
    .bind(&record.user_name)
    .bind(&record.password_hash)
    .bind(&record.password_salt)
    .bind(&record.location)
    .bind(record.age)
    .bind(&record.gender)
    .bind(&record.constellation)
    .bind(record.play_count)
    .bind(record.join_time)
    .execute(conn)
    .await?;
    Ok(())
}

/// Read every table into a [`SeedData`]
pub async fn export(pool: &SqlitePool) -> Result<SeedData> {
    Ok(SeedData {
        genres: sqlx::query_as("SELECT id, name, info FROM genres ORDER BY id")
            .fetch_all(pool)
            .await?,
        artists: sqlx::query_as("SELECT artist_id, name, reign FROM artists ORDER BY artist_id")
            .fetch_all(pool)
            .await?,
        albums: sqlx::query_as(
            r#"
            SELECT album_id, name, artist_id, album_lan, release_date,
                   album_category, record_label, star, listen_date
            FROM albums ORDER BY album_id
            "#,
        )
        .fetch_all(pool)
        .await?,
        songs: sqlx::query_as("SELECT song_id, name, star, album_id FROM songs ORDER BY song_id")
            .fetch_all(pool)
            .await?,
        song_meta: sqlx::query_as("SELECT song_id, lyrics FROM song_meta ORDER BY song_id")
            .fetch_all(pool)
            .await?,
        artist_meta: sqlx::query_as(
            "SELECT artist_id, info, pic_address FROM artist_meta ORDER BY artist_id",
        )
        .fetch_all(pool)
        .await?,
        album_meta: sqlx::query_as(
            "SELECT album_id, info, pic_address FROM album_meta ORDER BY album_id",
        )
        .fetch_all(pool)
        .await?,
        users: list_user_records(pool)
            .await?
            .into_iter()
            .map(SeedUser::from)
            .collect(),
        artist_genres: sqlx::query_as(
            "SELECT artist_id, genre_id FROM artist_genre_link ORDER BY artist_id, genre_id",
        )
        .fetch_all(pool)
        .await?,
        album_genres: sqlx::query_as(
            "SELECT album_id, genre_id FROM album_genre_link ORDER BY album_id, genre_id",
        )
        .fetch_all(pool)
        .await?,
        song_artists: sqlx::query_as(
            "SELECT song_id, artist_id FROM song_artist_link ORDER BY song_id, artist_id",
        )
        .fetch_all(pool)
        .await?,
        song_comments: list_all_comments::<SongComment>(pool)
            .await?
            .into_iter()
            .map(SeedSongComment::from)
            .collect(),
        album_comments: list_all_comments::<AlbumComment>(pool)
            .await?
            .into_iter()
            .map(SeedAlbumComment::from)
            .collect(),
        artist_comments: list_all_comments::<ArtistComment>(pool)
            .await?
            .into_iter()
            .map(SeedArtistComment::from)
            .collect(),
    })
}
