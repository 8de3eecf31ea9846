// ============================
// bookstore-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for login attempts.
//!
//! Keyed by an opaque client key (the reverse proxy's `x-real-ip` in
//! production). Failed logins accumulate until the client is locked out
//! for a fixed window; a successful login clears the slate.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of failed attempts before lockout
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct AttemptEntry {
    failed_attempts: u32,
    last_failure: Instant,
    lockout_expiry: Option<Instant>,
}

/// Rate limiter for login attempts
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    attempts: Arc<DashMap<String, AttemptEntry>>,
    max_attempts: u32,
    lockout_duration: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl AuthRateLimiter {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    /// Record a failed login attempt
    pub fn record_failed_attempt(&self, client: &str) {
        let now = Instant::now();

        let mut entry = self
            .attempts
            .entry(client.to_string())
            .or_insert_with(|| AttemptEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // Reset the counter once an earlier lockout has expired.
        if let Some(expiry) = entry.lockout_expiry {
            if now > expiry {
                entry.failed_attempts = 0;
                entry.lockout_expiry = None;
            }
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts {
            entry.lockout_expiry = Some(now + self.lockout_duration);
            tracing::warn!(client, "client locked out after repeated login failures");
        }
    }

    /// Record a successful login, clearing any accumulated failures
    pub fn record_success(&self, client: &str) {
        self.attempts.remove(client);
    }

    /// Check whether a client may attempt a login right now
    pub fn check_rate_limit(&self, client: &str) -> bool {
        if let Some(entry) = self.attempts.get(client) {
            if let Some(expiry) = entry.lockout_expiry {
                if Instant::now() < expiry {
                    return false;
                }
            }
        }
        true
    }

    /// Drop stale entries (expired lockouts and day-old failures)
    pub fn cleanup(&self) {
        let now = Instant::now();

        self.attempts.retain(|_, entry| {
            if let Some(expiry) = entry.lockout_expiry {
                return now < expiry;
            }
            now.duration_since(entry.last_failure) < Duration::from_secs(24 * 60 * 60)
        });
    }
}
