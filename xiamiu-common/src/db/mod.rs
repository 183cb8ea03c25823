//! Database models and queries

pub mod albums;
pub mod artists;
pub mod comments;
pub mod genres;
pub mod init;
pub mod meta;
pub mod models;
pub mod ratings;
pub mod search;
pub mod settings;
pub mod songs;
pub mod users;

pub use init::*;
pub use models::*;

use crate::Error;

/// Translate a UNIQUE/PRIMARY KEY violation into `Error::Duplicate`
///
/// Lookups before insert catch the common case; this covers the race where
/// two writers pass the lookup together.
pub(crate) fn duplicate_or(err: sqlx::Error, message: &str) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Duplicate(message.to_string())
        }
        _ => Error::Database(err),
    }
}
