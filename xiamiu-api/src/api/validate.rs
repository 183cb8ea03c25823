//! Request body validation helpers
//!
//! Lengths are counted in characters, not bytes.

use crate::{ApiError, ApiResult};
use std::ops::RangeInclusive;

/// Reject values longer than `max` characters
pub fn max_len(field: &str, value: &str, max: usize) -> ApiResult<()> {
    if value.chars().count() > max {
        return Err(ApiError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Reject empty (or whitespace-only) values and values longer than `max`
pub fn required(field: &str, value: &str, max: usize) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    max_len(field, value, max)
}

/// Path segments that sit beside `/artists/:artist_id`
pub const ARTIST_ROUTE_SEGMENTS: &[&str] = &["comments", "reign", "region"];
/// Path segments that sit beside `/albums/:album_id`
pub const ALBUM_ROUTE_SEGMENTS: &[&str] = &["comments", "language"];
/// Path segments that sit beside `/songs/:song_id`
pub const SONG_ROUTE_SEGMENTS: &[&str] = &["comments"];

/// Validate a client-supplied key that becomes a URL path segment
///
/// A key equal to a static route segment, or containing `/`, could never
/// be addressed by its own sub-resource routes.
pub fn path_key(field: &str, value: &str, max: usize, reserved: &[&str]) -> ApiResult<()> {
    required(field, value, max)?;
    if value.contains('/') {
        return Err(ApiError::BadRequest(format!("{} must not contain '/'", field)));
    }
    if reserved.contains(&value) {
        return Err(ApiError::BadRequest(format!(
            "{} '{}' is reserved",
            field, value
        )));
    }
    Ok(())
}

/// Reject integers outside `range`
pub fn in_range(field: &str, value: i64, range: RangeInclusive<i64>) -> ApiResult<()> {
    if !range.contains(&value) {
        return Err(ApiError::BadRequest(format!(
            "{} must be between {} and {}",
            field,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_len_counts_chars() {
        // 4 CJK characters are 12 bytes
        assert!(max_len("name", "七里香啊", 4).is_ok());
        assert!(max_len("name", "七里香啊!", 4).is_err());
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("artist_id", "  ", 20).is_err());
        assert!(required("artist_id", "a1", 20).is_ok());
    }

    #[test]
    fn test_path_key_rejects_route_segments() {
        assert!(path_key("artist_id", "comments", 20, ARTIST_ROUTE_SEGMENTS).is_err());
        assert!(path_key("artist_id", "region", 20, ARTIST_ROUTE_SEGMENTS).is_err());
        assert!(path_key("album_id", "language", 20, ALBUM_ROUTE_SEGMENTS).is_err());
        assert!(path_key("song_id", "a/b", 20, SONG_ROUTE_SEGMENTS).is_err());
        // Only exact matches are reserved
        assert!(path_key("artist_id", "comments2", 20, ARTIST_ROUTE_SEGMENTS).is_ok());
        assert!(path_key("song_id", "language", 20, SONG_ROUTE_SEGMENTS).is_ok());
    }

    #[test]
    fn test_in_range() {
        assert!(in_range("star", 1, 1..=5).is_ok());
        assert!(in_range("star", 6, 1..=5).is_err());
    }
}
