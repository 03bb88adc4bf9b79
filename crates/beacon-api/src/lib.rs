//! HTTP surface for the Beacon backlink tracker: handlers, the identity
//! gateway, validation, password hashing and token issuance. The store is
//! generic so tests drive the same router against `beacon_db::MemoryStore`
//! that production runs against Postgres.

pub mod auth;
pub mod campaigns;
pub mod client;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod password;
pub mod redirect;
pub mod routes;
pub mod token;
pub mod users;
pub mod validate;
