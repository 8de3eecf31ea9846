// crates/bookstore-lib/src/handlers/mod.rs

//! HTTP request handlers.

pub mod auth;
pub mod books;
pub mod orders;
pub mod users;
