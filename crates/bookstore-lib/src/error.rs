// crates/bookstore-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Wrong password or unknown email. Both collapse to the same message
    /// so callers cannot probe which accounts exist.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No token presented on a protected route.
    #[error("Missing token")]
    MissingToken,

    /// Token failed verification (malformed, bad signature, or expired —
    /// the precise reason is logged, never returned).
    #[error("Invalid token")]
    InvalidToken,

    /// A valid token resolved to an identity that no longer exists.
    #[error("Unauthorized access")]
    UnauthorizedAccess,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Too many login attempts, please try again later")]
    AuthRateLimited,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::InvalidToken
            | AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::TokenIssuance(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::MissingToken => "AUTH_002",
            AppError::InvalidToken => "AUTH_003",
            AppError::UnauthorizedAccess => "AUTH_004",
            AppError::Forbidden(_) => "AUTHZ_001",
            AppError::NotFound(_) => "NF_001",
            AppError::DuplicateEmail => "DUP_001",
            AppError::AuthRateLimited => "RATE_001",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Validation(_) => "VAL_002",
            AppError::Database(_) => "DB_001",
            AppError::TokenIssuance(_) => "TOKEN_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a message safe to return to the caller. Server-side faults are
    /// collapsed to a generic description; their detail only goes to the log.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::TokenIssuance(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %self, "request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(code = error_code, error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": self.sanitized_message(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_display() {
        // The two credential failures must be textually identical so a
        // caller cannot distinguish them.
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(AppError::MissingToken.to_string(), "Missing token");
        assert_eq!(AppError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(
            AppError::Forbidden("Not allowed to create a book".to_string()).to_string(),
            "Not allowed to create a book"
        );
        assert_eq!(AppError::NotFound("Book").to_string(), "Book not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::UnauthorizedAccess.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("nope".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("Order").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::AuthRateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::InvalidInput("bad id".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_001");
        assert_eq!(AppError::MissingToken.error_code(), "AUTH_002");
        assert_eq!(AppError::InvalidToken.error_code(), "AUTH_003");
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "AUTHZ_001");
        assert_eq!(AppError::Internal(String::new()).error_code(), "INT_001");
    }

    #[test]
    fn test_sanitized_message_hides_server_detail() {
        let err = AppError::Internal("secret key unreadable".to_string());
        assert_eq!(err.sanitized_message(), "An internal server error occurred");

        let err = AppError::TokenIssuance("hmac failure".to_string());
        assert_eq!(err.sanitized_message(), "An internal server error occurred");

        // Client-facing errors keep their message verbatim.
        let err = AppError::NotFound("Book");
        assert_eq!(err.sanitized_message(), "Book not found");
    }

    #[test]
    fn test_app_error_into_response() {
        let error = AppError::NotFound("Book");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response_headers = response.headers();
        assert!(response_headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }

    #[test]
    fn test_error_from_impls() {
        let app_err: AppError = "boom".into();
        assert!(matches!(app_err, AppError::Internal(_)));

        let app_err: AppError = String::from("boom").into();
        assert!(matches!(app_err, AppError::Internal(_)));

        let app_err: AppError = ValidationError::InvalidEmail("not-an-email".to_string()).into();
        assert!(matches!(app_err, AppError::Validation(_)));
        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
    }
}
