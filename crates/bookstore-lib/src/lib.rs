// ============================
// bookstore-lib/src/lib.rs
// ============================
//! Core functionality for the bookstore REST backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthRateLimiter, Authenticator, TokenCodec};
use crate::config::Settings;
use crate::store::Store;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Persistence backend
    pub store: S,
    /// Session authenticator (login + token validation)
    pub auth: Authenticator<S>,
    /// Settings, loaded once at startup
    pub settings: Arc<Settings>,
    /// Failed-login lockout tracking
    pub login_limiter: AuthRateLimiter,
}

impl<S: Store + Clone> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: Settings) -> Self {
        let codec = TokenCodec::new(settings.jwt_secret.as_bytes(), settings.token_ttl_secs);
        let auth = Authenticator::new(store.clone(), codec);
        let login_limiter = AuthRateLimiter::new(
            settings.login_limits.max_attempts,
            Duration::from_secs(settings.login_limits.lockout_secs),
        );

        Self {
            store,
            auth,
            settings: Arc::new(settings),
            login_limiter,
        }
    }
}
