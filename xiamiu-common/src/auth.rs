//! Password hashing and bearer tokens
//!
//! # Passwords
//!
//! Each user gets a random 16-byte salt. The stored hash is SHA-256 applied
//! `PASSWORD_ROUNDS` times over `salt || password`, hex encoded.
//!
//! # Tokens
//!
//! A token is `<payload>.<signature>` where
//! - `payload` is base64url (no padding) of `{"sub":<user id>,"name":<user name>,"exp":<unix secs>}`
//! - `signature` is hex SHA-256 of `payload` followed by the server secret
//!   as a decimal i64
//!
//! The secret lives in the `settings` table (see [`crate::db::settings`]).
//!
//! This module holds only pure functions; HTTP extraction lives in the
//! API crate.

use crate::time::{expiry_after_minutes, now};
use crate::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Iterations of SHA-256 applied to salted passwords
pub const PASSWORD_ROUNDS: usize = 10_000;

/// Salt length in bytes
const SALT_LEN: usize = 16;

// ========================================
// Passwords
// ========================================

/// Salted password hash ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub hash: String,
    pub salt: String,
}

/// Hash `password` with a fresh random salt
pub fn hash_password(password: &str) -> HashedPassword {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = to_hex(&salt_bytes);
    let hash = hash_with_salt(password, &salt);
    HashedPassword { hash, salt }
}

/// Hash `password` with a known salt
pub fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();

    for _ in 1..PASSWORD_ROUNDS {
        digest = Sha256::digest(digest);
    }

    format!("{:x}", digest)
}

/// Check `password` against a stored salt and hash
///
/// # Examples
///
/// ```
/// use xiamiu_common::auth::{hash_password, verify_password};
///
/// let stored = hash_password("hunter2");
/// assert!(verify_password("hunter2", &stored.salt, &stored.hash));
/// assert!(!verify_password("hunter3", &stored.salt, &stored.hash));
/// ```
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let calculated = hash_with_salt(password, salt);
    constant_time_eq(calculated.as_bytes(), expected_hash.as_bytes())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ========================================
// Bearer tokens
// ========================================

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// User name at issue time
    pub name: String,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Token response body for `/token` and `/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Signature over an encoded payload
fn sign(payload: &str, secret: i64) -> String {
    let digest = Sha256::new()
        .chain_update(payload.as_bytes())
        .chain_update(secret.to_string().as_bytes())
        .finalize();
    format!("{:x}", digest)
}

/// Encode and sign claims
pub fn encode_token(claims: &Claims, secret: i64) -> Result<String> {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
    let signature = sign(&payload, secret);
    Ok(format!("{}.{}", payload, signature))
}

/// Issue a token for a user valid for `ttl_minutes`
///
/// # Examples
///
/// ```
/// use xiamiu_common::auth::{issue_token, verify_token};
///
/// let token = issue_token(7, "alice", 30, 123456789).unwrap();
/// let claims = verify_token(&token, 123456789).unwrap();
/// assert_eq!(claims.sub, 7);
/// assert!(verify_token(&token, 987654321).is_err());
/// ```
pub fn issue_token(user_id: i64, user_name: &str, ttl_minutes: i64, secret: i64) -> Result<String> {
    let claims = Claims {
        sub: user_id,
        name: user_name.to_string(),
        exp: expiry_after_minutes(ttl_minutes),
    };
    encode_token(&claims, secret)
}

/// Verify signature and expiry, returning the claims
pub fn verify_token(token: &str, secret: i64) -> Result<Claims> {
    let (payload, signature) = token
        .split_once('.')
        .ok_or_else(|| Error::Auth("Malformed token".to_string()))?;

    let expected = sign(payload, secret);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(Error::Auth("Invalid token signature".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| Error::Auth("Malformed token".to_string()))?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|_| Error::Auth("Malformed token".to_string()))?;

    if claims.exp <= now().timestamp() {
        return Err(Error::Auth("Token expired".to_string()));
    }

    Ok(claims)
}

/// Pull the token out of an `Authorization` header value
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
