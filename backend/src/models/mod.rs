//! Data models shared across storage and API handlers.

pub mod auth;
pub mod profile_auth;
pub mod world;
