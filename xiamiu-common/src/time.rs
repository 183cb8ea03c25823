//! Timestamp utilities

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in UTC, used for `join_time` and `review_date` defaults
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Unix seconds `minutes` from now
pub fn expiry_after_minutes(minutes: i64) -> i64 {
    (now() + Duration::minutes(minutes)).timestamp()
}
