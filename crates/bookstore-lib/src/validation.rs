// ============================
// bookstore-lib/src/validation.rs
// ============================
//! Request payload validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::auth::password::PasswordRequirements;
use crate::models::{BookInput, OrderInput};
use crate::policy::Role;

// Common validation constants
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MIN_TITLE_LENGTH: usize = 3;
const MIN_AUTHOR_LENGTH: usize = 3;
const MAX_STATUS_LENGTH: usize = 50;

// Defaults matching the public paged endpoints
const DEFAULT_PAGE_LIMIT: i64 = 2;
const DEFAULT_PAGE: i64 = 1;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid book: {0}")]
    InvalidBook(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email must not be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Email is not a valid address".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a password chosen at registration
pub fn validate_new_password(
    password: &str,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    if !crate::auth::password::validate_password_strength(password, requirements) {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {} characters",
            requirements.min_length
        )));
    }

    Ok(())
}

/// Validate a submitted role tag against the closed set
pub fn validate_role(role: &str) -> ValidationResult<Role> {
    Role::parse(role)
        .ok_or_else(|| ValidationError::InvalidRole(format!("'{role}' is not a known role")))
}

/// Validate a book payload
pub fn validate_book(input: &BookInput) -> ValidationResult<()> {
    if input.title.len() < MIN_TITLE_LENGTH {
        return Err(ValidationError::InvalidBook(format!(
            "Title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }

    if input.author.len() < MIN_AUTHOR_LENGTH {
        return Err(ValidationError::InvalidBook(format!(
            "Author must be at least {MIN_AUTHOR_LENGTH} characters"
        )));
    }

    if input.price <= 0 {
        return Err(ValidationError::InvalidBook(
            "Price must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Validate an order payload
pub fn validate_order(input: &OrderInput) -> ValidationResult<()> {
    if input.status.is_empty() {
        return Err(ValidationError::InvalidOrder(
            "Status must not be empty".to_string(),
        ));
    }

    if input.status.len() > MAX_STATUS_LENGTH {
        return Err(ValidationError::InvalidOrder(format!(
            "Status must be at most {MAX_STATUS_LENGTH} characters"
        )));
    }

    if input.total_price <= 0 {
        return Err(ValidationError::InvalidOrder(
            "Total price must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Normalize pagination parameters, falling back to the endpoint defaults
/// for missing or non-positive values. Returns `(limit, page)`.
pub fn normalize_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let limit = match limit {
        Some(l) if l > 0 => l,
        _ => DEFAULT_PAGE_LIMIT,
    };
    let page = match page {
        Some(p) if p > 0 => p,
        _ => DEFAULT_PAGE,
    };
    (limit, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_new_password() {
        let requirements = PasswordRequirements::default();

        assert!(validate_new_password("longenough", &requirements).is_ok());
        assert!(validate_new_password("short", &requirements).is_err());
        assert!(validate_new_password(&"p".repeat(200), &requirements).is_err());
    }

    #[test]
    fn test_validate_role() {
        assert_eq!(validate_role("Admin").unwrap(), Role::Admin);
        assert_eq!(validate_role("Customer").unwrap(), Role::Customer);
        assert!(validate_role("admin").is_err());
        assert!(validate_role("Owner").is_err());
    }

    #[test]
    fn test_validate_book() {
        let good = BookInput {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            price: 25,
        };
        assert!(validate_book(&good).is_ok());

        let mut bad = good.clone();
        bad.title = "ab".to_string();
        assert!(validate_book(&bad).is_err());

        let mut bad = good.clone();
        bad.author = "x".to_string();
        assert!(validate_book(&bad).is_err());

        let mut bad = good;
        bad.price = 0;
        assert!(validate_book(&bad).is_err());
    }

    #[test]
    fn test_validate_order() {
        let good = OrderInput {
            status: "pending".to_string(),
            total_price: 42,
        };
        assert!(validate_order(&good).is_ok());

        let mut bad = good.clone();
        bad.status = String::new();
        assert!(validate_order(&bad).is_err());

        let mut bad = good;
        bad.total_price = -1;
        assert!(validate_order(&bad).is_err());
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (2, 1));
        assert_eq!(normalize_page(Some(3), Some(10)), (10, 3));
        assert_eq!(normalize_page(Some(0), Some(-5)), (2, 1));
    }
}
