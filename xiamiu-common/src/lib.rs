//! # Xiamiu Common Library
//!
//! Shared code for the Xiamiu catalog services:
//! - Database schema, models and queries
//! - Password hashing and bearer token handling
//! - Rating aggregation
//! - Configuration loading and root folder resolution
//! - Seed data import/export

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod rating;
pub mod seed;
pub mod time;

pub use error::{Error, Result};
