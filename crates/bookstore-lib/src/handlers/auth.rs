// ============================
// bookstore-lib/src/handlers/auth.rs
// ============================
//! Registration and login handlers.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::error::AppError;
use crate::middleware::auth::AUTH_COOKIE;
use crate::models::{LoginRequest, RegisterRequest};
use crate::store::Store;
use crate::validation;
use crate::AppState;

/// Register a new account.
///
/// `POST /api/v1/auth/register` — public. The password is hashed before it
/// touches the store; the plaintext buffer is zeroized afterwards.
pub async fn register<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(mut req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_email(&req.email)?;
    validation::validate_new_password(&req.password, &state.settings.password_requirements)?;
    let role = validation::validate_role(&req.role)?;

    let hash = crate::auth::hash_password_secure(&mut req.password).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        AppError::Internal("could not hash password".to_string())
    })?;

    let user = state.store.create_user(&req.email, &hash, role).await?;
    tracing::info!(user_id = user.id, "account registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a session token.
///
/// `POST /api/v1/auth/login` — public. On success the token is returned as
/// an `auth_token` cookie alongside `{"userId": id}`. Repeated failures
/// from the same client are locked out before any hashing work happens.
pub async fn login<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client = client_key(&headers);

    if !state.login_limiter.check_rate_limit(&client) {
        return Err(AppError::AuthRateLimited);
    }

    match state.auth.login(&req.email, &req.password, Utc::now()).await {
        Ok(outcome) => {
            state.login_limiter.record_success(&client);

            let cookie = format!(
                "{}={}; HttpOnly; Path=/; Max-Age={}",
                AUTH_COOKIE, outcome.token, state.settings.token_ttl_secs
            );

            Ok((
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(serde_json::json!({ "userId": outcome.user_id })),
            ))
        },
        Err(err) => {
            if matches!(err, AppError::InvalidCredentials) {
                state.login_limiter.record_failed_attempt(&client);
            }
            Err(err)
        },
    }
}

/// Client key for login lockout tracking: the reverse proxy's reported
/// address, or a shared bucket when no proxy header is present.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
