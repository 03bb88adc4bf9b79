//! Shared types for the Beacon backlink tracker.
//!
//! Data model structs live in [`models`], request/response DTOs in [`api`].
//! Everything here is plain data so both the database layer and the HTTP
//! layer can depend on it without pulling in each other.

pub mod api;
pub mod models;

pub use api::*;
pub use models::*;
