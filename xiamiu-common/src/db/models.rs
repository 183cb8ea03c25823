//! Database models
//!
//! Row types derive `sqlx::FromRow` and serialize straight into API
//! responses. `*Create` types are request payloads.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ========================================
// Genres
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreCreate {
    pub name: String,
    #[serde(default)]
    pub info: String,
}

// ========================================
// Artists
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub reign: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistCreate {
    pub artist_id: String,
    pub name: String,
    #[serde(default)]
    pub reign: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

// ========================================
// Albums
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Album {
    pub album_id: String,
    pub name: String,
    pub artist_id: String,
    pub album_lan: String,
    pub release_date: NaiveDate,
    pub album_category: String,
    pub record_label: String,
    /// Editorial score, 1-100
    pub star: i64,
    pub listen_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumCreate {
    pub album_id: String,
    pub name: String,
    pub artist_id: String,
    #[serde(default)]
    pub album_lan: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub album_category: String,
    #[serde(default)]
    pub record_label: String,
    pub star: i64,
    #[serde(default)]
    pub listen_date: Option<NaiveDate>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

// ========================================
// Songs
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub song_id: String,
    pub name: String,
    /// Editorial score, 1-5
    pub star: i64,
    pub album_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongCreate {
    pub song_id: String,
    pub name: String,
    pub star: i64,
    pub album_id: String,
    #[serde(default)]
    pub artist_ids: Vec<String>,
}

// ========================================
// Meta side tables
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongMeta {
    pub song_id: String,
    pub lyrics: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongMetaCreate {
    #[serde(default)]
    pub lyrics: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistMeta {
    pub artist_id: String,
    pub info: String,
    pub pic_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlbumMeta {
    pub album_id: String,
    pub info: String,
    pub pic_address: String,
}

/// Payload shared by artist and album meta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoMetaCreate {
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub pic_address: String,
}

// ========================================
// Users
// ========================================

/// Public user profile (never carries credentials)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub location: String,
    pub age: Option<i64>,
    pub gender: String,
    pub constellation: String,
    pub play_count: i64,
    pub join_time: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub user_name: String,
    pub password: String,
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

/// Full users row including the stored password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub user_name: String,
    pub password_hash: String,
    pub password_salt: String,
    pub location: String,
    pub age: Option<i64>,
    pub gender: String,
    pub constellation: String,
    pub play_count: i64,
    pub join_time: NaiveDate,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            user_name: record.user_name,
            location: record.location,
            age: record.age,
            gender: record.gender,
            constellation: record.constellation,
            play_count: record.play_count,
            join_time: record.join_time,
        }
    }
}

// ========================================
// Comments
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongComment {
    pub id: i64,
    pub song_id: String,
    pub user_id: i64,
    pub comment: String,
    pub star: i64,
    pub num_like: i64,
    pub review_date: NaiveDate,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlbumComment {
    pub id: i64,
    pub album_id: String,
    pub user_id: i64,
    pub comment: String,
    pub star: i64,
    pub num_like: i64,
    pub review_date: NaiveDate,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistComment {
    pub id: i64,
    pub artist_id: String,
    pub user_id: i64,
    pub comment: String,
    pub num_like: i64,
    pub review_date: NaiveDate,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
}

/// Comment payload for every comment kind
///
/// `star` is required for song and album comments and rejected for artist
/// comments. The author always comes from the bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentCreate {
    pub comment: String,
    #[serde(default)]
    pub star: Option<i64>,
    #[serde(default)]
    pub num_like: Option<i64>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
}

// ========================================
// Link tables
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistGenreLink {
    pub artist_id: String,
    pub genre_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlbumGenreLink {
    pub album_id: String,
    pub genre_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongArtistLink {
    pub song_id: String,
    pub artist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
