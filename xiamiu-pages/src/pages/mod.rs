//! Server-rendered pages

pub mod album;
pub mod artist;
pub mod genre;
pub mod health;
pub mod home;
pub mod layout;
pub mod search;
pub mod song;
