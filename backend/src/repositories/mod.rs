//! Storage traits and their Postgres / in-memory implementations.

pub mod memory;
pub mod profile_auth;
pub mod world;

pub use memory::{InMemoryProfileAuthStore, InMemoryWorldStore};
pub use profile_auth::{PgProfileAuthStore, ProfileAuthStore};
pub use world::{PgWorldStore, WorldStore};
