// ============================
// bookstore-lib/src/auth/mod.rs
// ============================
//! Authentication module: password hashing, token codec, session
//! authenticator, and login attempt limiting.

pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token;

pub use password::{hash_password, hash_password_secure, verify_password, PasswordRequirements};
pub use rate_limit::AuthRateLimiter;
pub use session::{Authenticator, LoginOutcome};
pub use token::{TokenCodec, TokenError};
