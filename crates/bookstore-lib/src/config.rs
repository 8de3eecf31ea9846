// ============================
// bookstore-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use figment::{Figment, providers::{Env, Format, Toml}};
use serde::Deserialize;

use crate::auth::password::PasswordRequirements;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Postgres connection string. Required; startup fails without it.
    pub database_url: String,
    /// Token signing secret. Required; startup fails without it.
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Login lockout thresholds
    #[serde(default)]
    pub login_limits: LoginLimits,
    /// Password requirements for registration
    #[serde(default)]
    pub password_requirements: PasswordRequirements,
}

/// Failed-login lockout thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct LoginLimits {
    pub max_attempts: u32,
    pub lockout_secs: u64,
}

impl Default for LoginLimits {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "127.0.0.1:3000".parse().unwrap()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from `config.toml` merged with `BOOKSTORE_`-prefixed
    /// environment variables (environment wins).
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit config file path plus environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("BOOKSTORE_"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Sanity-check loaded values beyond what deserialization enforces
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.jwt_secret.is_empty(), "jwt_secret must not be empty");
        anyhow::ensure!(!self.database_url.is_empty(), "database_url must not be empty");
        anyhow::ensure!(self.token_ttl_secs > 0, "token_ttl_secs must be positive");
        anyhow::ensure!(
            self.login_limits.max_attempts > 0,
            "login_limits.max_attempts must be positive"
        );

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {},
            other => anyhow::bail!("unknown log level: {other}"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Toml::string(toml))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn test_minimal_config_with_defaults() {
        let settings = from_toml(
            r#"
            database_url = "postgres://localhost/bookstore"
            jwt_secret = "super-secret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(settings.token_ttl_secs, 3600);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.login_limits.max_attempts, 5);
        assert_eq!(settings.password_requirements.min_length, 8);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = from_toml(
            r#"
            database_url = "postgres://localhost/bookstore"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        let result = from_toml(
            r#"
            jwt_secret = "super-secret"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let result = from_toml(
            r#"
            database_url = "postgres://localhost/bookstore"
            jwt_secret = ""
            "#,
        );
        assert!(result.is_err());

        let result = from_toml(
            r#"
            database_url = "postgres://localhost/bookstore"
            jwt_secret = "super-secret"
            log_level = "loud"
            "#,
        );
        assert!(result.is_err());

        let result = from_toml(
            r#"
            database_url = "postgres://localhost/bookstore"
            jwt_secret = "super-secret"
            token_ttl_secs = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let settings = from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            database_url = "postgres://localhost/bookstore"
            jwt_secret = "super-secret"
            token_ttl_secs = 60
            log_level = "debug"

            [login_limits]
            max_attempts = 3
            lockout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(settings.token_ttl_secs, 60);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.login_limits.max_attempts, 3);
        assert_eq!(settings.login_limits.lockout_secs, 30);
    }
}
