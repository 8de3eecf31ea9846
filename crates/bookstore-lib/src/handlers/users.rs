// ============================
// bookstore-lib/src/handlers/users.rs
// ============================
//! Account administration handlers. All Admin-only, with no self-service
//! shortcut: an Admin addresses their own record by id like any other.
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::error::AppError;
use crate::models::{CurrentUser, PageQuery, UpdateUserRequest, User};
use crate::policy::{self, Action};
use crate::store::Store;
use crate::validation;
use crate::AppState;

const DRAIN_PAGE_SIZE: i64 = 3;

/// `GET /api/v1/users` — Admin paged listing
pub async fn page_of_users<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ListUsers)?;

    let (limit, page) = validation::normalize_page(params.page, params.limit);
    let users = state.store.users_page(limit, page).await?;
    Ok(Json(users))
}

/// `GET /api/v2/users/all` — Admin bulk listing
pub async fn all_users<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ListAllUsers)?;

    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let users = state.store.users_page(DRAIN_PAGE_SIZE, page).await?;
        let count = users.len();
        all.extend(users);
        if (count as i64) < DRAIN_PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(Json(all))
}

/// `GET /api/v1/users/{id}` — Admin
pub async fn get_user<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ReadUser)?;

    let found = state
        .store
        .user_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(found))
}

/// `PUT /api/v1/users/{id}` — Admin. Omitting the password keeps the
/// stored hash; supplying one re-hashes it.
pub async fn update_user<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::UpdateUser)?;

    let existing = state
        .store
        .user_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    validation::validate_email(&req.email)?;
    let role = validation::validate_role(&req.role)?;

    let password_hash = match req.password {
        Some(mut password) => {
            validation::validate_new_password(&password, &state.settings.password_requirements)?;
            crate::auth::hash_password_secure(&mut password).map_err(|err| {
                tracing::error!(error = %err, "password hashing failed");
                AppError::Internal("could not hash password".to_string())
            })?
        },
        None => existing.password_hash,
    };

    let updated = User {
        id,
        email: req.email,
        password_hash,
        role,
    };
    state.store.update_user(&updated).await?;

    Ok(Json(updated))
}

/// `DELETE /api/v1/users/{id}` — Admin
pub async fn delete_user<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::DeleteUser)?;

    state.store.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
