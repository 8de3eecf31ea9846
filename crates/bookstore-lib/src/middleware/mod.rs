// crates/bookstore-lib/src/middleware/mod.rs

//! Middleware for the bookstore REST backend.

pub mod auth;

pub use auth::require_auth;
