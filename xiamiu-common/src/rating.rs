//! Rating aggregation
//!
//! Stored scores are averaged and rescaled into star values for display:
//!
//! | Source              | Stored range | `score`            | `stars`                     |
//! |---------------------|--------------|--------------------|-----------------------------|
//! | song comment stars  | 1-5          | n/a                | average snapped to 0.5, 1-5 |
//! | album comment stars | 1-100        | average / 10, 1-10 | round(score) / 2, 1-5       |
//!
//! An empty set of ratings produces `count = 0` and no values.

use serde::{Deserialize, Serialize};

/// Lowest and highest displayable star value
pub const MIN_STARS: f64 = 1.0;
pub const MAX_STARS: f64 = 5.0;

/// Bounds of a rescaled album score
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// Aggregated song rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRating {
    pub count: i64,
    pub average: Option<f64>,
    pub stars: Option<f64>,
}

/// Aggregated album rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRating {
    pub count: i64,
    pub average: Option<f64>,
    /// Average rescaled to 1-10
    pub score: Option<f64>,
    pub stars: Option<f64>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn clamp_stars(stars: f64) -> f64 {
    stars.clamp(MIN_STARS, MAX_STARS)
}

/// Snap a 1-5 average to the nearest half star
pub fn song_stars(average: f64) -> f64 {
    clamp_stars((average * 2.0).round() / 2.0)
}

/// Rescale a 1-100 average to a 1-10 score with one decimal
pub fn album_score(average: f64) -> f64 {
    round_to(average / 10.0, 1).clamp(MIN_SCORE, MAX_SCORE)
}

/// Half-star value for a 1-10 score
pub fn album_stars(score: f64) -> f64 {
    clamp_stars(score.round() / 2.0)
}

/// Build a song rating from a count and raw mean (`None` when count is 0)
pub fn song_rating(count: i64, mean: Option<f64>) -> SongRating {
    match mean {
        Some(mean) if count > 0 => SongRating {
            count,
            average: Some(round_to(mean, 2)),
            stars: Some(song_stars(mean)),
        },
        _ => SongRating {
            count: 0,
            average: None,
            stars: None,
        },
    }
}

/// Build an album rating from a count and raw mean (`None` when count is 0)
pub fn album_rating(count: i64, mean: Option<f64>) -> AlbumRating {
    match mean {
        Some(mean) if count > 0 => {
            let score = album_score(mean);
            AlbumRating {
                count,
                average: Some(round_to(mean, 2)),
                score: Some(score),
                stars: Some(album_stars(score)),
            }
        }
        _ => AlbumRating {
            count: 0,
            average: None,
            score: None,
            stars: None,
        },
    }
}
