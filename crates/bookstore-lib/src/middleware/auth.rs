// ============================
// bookstore-lib/src/middleware/auth.rs
// ============================
//! Request authentication middleware.
//!
//! Extracts the session token (bearer header first, `auth_token` cookie as
//! fallback), validates it, resolves the principal, and attaches it to the
//! request. Routes behind this middleware can rely on a `CurrentUser`
//! extension being present.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::error::AppError;
use crate::models::CurrentUser;
use crate::store::Store;
use crate::AppState;

/// Cookie carrying the session token
pub const AUTH_COOKIE: &str = "auth_token";

/// Authentication middleware for protected routes
pub async fn require_auth<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or(AppError::MissingToken)?;

    let user = state.auth.authenticate(&token, Utc::now()).await?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Pull the token out of the request. The `Authorization: Bearer` header
/// wins over the cookie when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(cookie_token)
}

fn cookie_token(raw: &str) -> Option<String> {
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE).then(|| value.to_string())
    })
}
