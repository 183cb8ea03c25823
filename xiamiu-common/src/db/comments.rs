//! Comment queries for songs, albums and artists
//!
//! The three comment tables share one shape apart from the key column and
//! the optional star column, so queries are written once against
//! [`CommentKind`] and decoded into the matching row type.

use crate::db::albums::get_album;
use crate::db::artists::get_artist;
use crate::db::models::{AlbumComment, ArtistComment, CommentCreate, SongComment};
use crate::db::songs::get_song;
use crate::db::users::get_user;
use crate::time::today;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use std::ops::RangeInclusive;

/// Which entity a comment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Song,
    Album,
    Artist,
}

impl CommentKind {
    pub fn table(self) -> &'static str {
        match self {
            CommentKind::Song => "song_comments",
            CommentKind::Album => "album_comments",
            CommentKind::Artist => "artist_comments",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            CommentKind::Song => "song_id",
            CommentKind::Album => "album_id",
            CommentKind::Artist => "artist_id",
        }
    }

    /// Entity name used in error messages
    pub fn entity_name(self) -> &'static str {
        match self {
            CommentKind::Song => "Song",
            CommentKind::Album => "Album",
            CommentKind::Artist => "Artist",
        }
    }

    /// Allowed comment star range, `None` when the kind carries no rating
    pub fn star_range(self) -> Option<RangeInclusive<i64>> {
        match self {
            CommentKind::Song => Some(1..=5),
            CommentKind::Album => Some(1..=100),
            CommentKind::Artist => None,
        }
    }

    fn columns(self) -> String {
        let star = if self.star_range().is_some() { "star, " } else { "" };
        format!(
            "id, {}, user_id, comment, {}num_like, review_date, created, modified",
            self.key_column(),
            star
        )
    }
}

impl std::fmt::Display for CommentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Row type stored in each comment table
pub trait CommentRow: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const KIND: CommentKind;

    fn id(&self) -> i64;
    fn user_id(&self) -> i64;
}

impl CommentRow for SongComment {
    const KIND: CommentKind = CommentKind::Song;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> i64 {
        self.user_id
    }
}

impl CommentRow for AlbumComment {
    const KIND: CommentKind = CommentKind::Album;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> i64 {
        self.user_id
    }
}

impl CommentRow for ArtistComment {
    const KIND: CommentKind = CommentKind::Artist;

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> i64 {
        self.user_id
    }
}

/// Whether the entity a comment of `kind` would attach to exists
pub async fn target_exists(pool: &SqlitePool, kind: CommentKind, target_id: &str) -> Result<bool> {
    let exists = match kind {
        CommentKind::Song => get_song(pool, target_id).await?.is_some(),
        CommentKind::Album => get_album(pool, target_id).await?.is_some(),
        CommentKind::Artist => get_artist(pool, target_id).await?.is_some(),
    };
    Ok(exists)
}

/// Check a comment payload against the rules of its kind
pub fn validate_comment(kind: CommentKind, comment: &CommentCreate) -> Result<()> {
    if comment.comment.chars().count() > 255 {
        return Err(Error::InvalidInput(
            "comment must be at most 255 characters".to_string(),
        ));
    }

    if let Some(num_like) = comment.num_like {
        if num_like < 0 {
            return Err(Error::InvalidInput("num_like must not be negative".to_string()));
        }
    }

    match (kind.star_range(), comment.star) {
        (Some(range), Some(star)) if range.contains(&star) => Ok(()),
        (Some(range), Some(star)) => Err(Error::InvalidInput(format!(
            "star must be between {} and {}, got {}",
            range.start(),
            range.end(),
            star
        ))),
        (Some(_), None) => Err(Error::InvalidInput(format!(
            "{} comments require a star rating",
            kind.entity_name().to_lowercase()
        ))),
        (None, Some(_)) => Err(Error::InvalidInput(
            "artist comments do not carry a star rating".to_string(),
        )),
        (None, None) => Ok(()),
    }
}

/// Insert a comment by `user_id` on `target_id`
///
/// Returns `NotFound` when the target entity is missing and
/// `InvalidInput` when the payload fails validation.
pub async fn create_comment<T: CommentRow>(
    pool: &SqlitePool,
    target_id: &str,
    user_id: i64,
    comment: &CommentCreate,
) -> Result<T> {
    let kind = T::KIND;
    validate_comment(kind, comment)?;

    if !target_exists(pool, kind, target_id).await? {
        return Err(Error::NotFound(kind.entity_name().to_string()));
    }
    if get_user(pool, user_id).await?.is_none() {
        return Err(Error::NotFound("User".to_string()));
    }

    let review_date = comment.review_date.unwrap_or_else(today);
    let num_like = comment.num_like.unwrap_or(0);

    let id = match kind.star_range() {
        Some(_) => {
            sqlx::query(&format!(
                "INSERT INTO {} ({}, user_id, comment, star, num_like, review_date) VALUES (?, ?, ?, ?, ?, ?)",
                kind.table(),
                kind.key_column()
            ))
            .bind(target_id)
            .bind(user_id)
            .bind(&comment.comment)
            .bind(comment.star)
            .bind(num_like)
            .bind(review_date)
            .execute(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "INSERT INTO {} ({}, user_id, comment, num_like, review_date) VALUES (?, ?, ?, ?, ?)",
                kind.table(),
                kind.key_column()
            ))
            .bind(target_id)
            .bind(user_id)
            .bind(&comment.comment)
            .bind(num_like)
            .bind(review_date)
            .execute(pool)
            .await?
        }
    }
    .last_insert_rowid();

    get_comment::<T>(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("{} comment {} vanished after insert", kind, id)))
}

pub async fn get_comment<T: CommentRow>(pool: &SqlitePool, id: i64) -> Result<Option<T>> {
    let kind = T::KIND;
    let comment = sqlx::query_as::<_, T>(&format!(
        "SELECT {} FROM {} WHERE id = ?",
        kind.columns(),
        kind.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

/// Comments on one entity, newest first
pub async fn list_comments_for_target<T: CommentRow>(
    pool: &SqlitePool,
    target_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<T>> {
    let kind = T::KIND;
    let comments = sqlx::query_as::<_, T>(&format!(
        "SELECT {} FROM {} WHERE {} = ? ORDER BY created DESC, id DESC LIMIT ? OFFSET ?",
        kind.columns(),
        kind.table(),
        kind.key_column()
    ))
    .bind(target_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Comments written by one user, newest first
pub async fn list_comments_by_user<T: CommentRow>(
    pool: &SqlitePool,
    user_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<T>> {
    let kind = T::KIND;
    let comments = sqlx::query_as::<_, T>(&format!(
        "SELECT {} FROM {} WHERE user_id = ? ORDER BY created DESC, id DESC LIMIT ? OFFSET ?",
        kind.columns(),
        kind.table()
    ))
    .bind(user_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Every comment of one kind (seed export)
pub async fn list_all_comments<T: CommentRow>(pool: &SqlitePool) -> Result<Vec<T>> {
    let kind = T::KIND;
    let comments = sqlx::query_as::<_, T>(&format!(
        "SELECT {} FROM {} ORDER BY id",
        kind.columns(),
        kind.table()
    ))
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Delete a comment owned by `user_id`
///
/// `NotFound` if the comment does not exist, `Forbidden` if it belongs to
/// another user.
pub async fn delete_comment<T: CommentRow>(pool: &SqlitePool, id: i64, user_id: i64) -> Result<T> {
    let kind = T::KIND;
    let comment = get_comment::<T>(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound("Comment".to_string()))?;

    if comment.user_id() != user_id {
        return Err(Error::Forbidden(format!(
            "{} comment {} belongs to another user",
            kind, id
        )));
    }

    sqlx::query(&format!("DELETE FROM {} WHERE id = ? AND user_id = ?", kind.table()))
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(comment)
}

/// Increment `num_like`; the table trigger refreshes `modified`
pub async fn like_comment<T: CommentRow>(pool: &SqlitePool, id: i64) -> Result<T> {
    let kind = T::KIND;
    let result = sqlx::query(&format!(
        "UPDATE {} SET num_like = num_like + 1 WHERE id = ?",
        kind.table()
    ))
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("Comment".to_string()));
    }

    get_comment::<T>(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound("Comment".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(star: Option<i64>) -> CommentCreate {
        CommentCreate {
            comment: "great".to_string(),
            star,
            num_like: None,
            review_date: None,
        }
    }

    #[test]
    fn test_song_star_bounds() {
        assert!(validate_comment(CommentKind::Song, &payload(Some(1))).is_ok());
        assert!(validate_comment(CommentKind::Song, &payload(Some(5))).is_ok());
        assert!(validate_comment(CommentKind::Song, &payload(Some(0))).is_err());
        assert!(validate_comment(CommentKind::Song, &payload(Some(6))).is_err());
        assert!(validate_comment(CommentKind::Song, &payload(None)).is_err());
    }

    #[test]
    fn test_album_star_bounds() {
        assert!(validate_comment(CommentKind::Album, &payload(Some(100))).is_ok());
        assert!(validate_comment(CommentKind::Album, &payload(Some(101))).is_err());
    }

    #[test]
    fn test_artist_comment_rejects_star() {
        assert!(validate_comment(CommentKind::Artist, &payload(None)).is_ok());
        assert!(validate_comment(CommentKind::Artist, &payload(Some(3))).is_err());
    }

    #[test]
    fn test_comment_length_limit() {
        let mut long = payload(None);
        long.comment = "x".repeat(256);
        assert!(validate_comment(CommentKind::Artist, &long).is_err());
        long.comment = "x".repeat(255);
        assert!(validate_comment(CommentKind::Artist, &long).is_ok());
    }

    #[test]
    fn test_columns_omit_star_for_artists() {
        assert!(!CommentKind::Artist.columns().contains("star"));
        assert!(CommentKind::Song.columns().contains("star"));
    }
}
