// ============================
// bookstore-lib/src/handlers/orders.rs
// ============================
//! Order CRUD handlers.
//!
//! Customers create and manage their own orders; Admins delete and list.
//! For ownership-gated reads and updates, existence is checked before
//! ownership: an absent order is 404 for anyone allowed to ask, a present
//! but foreign order is 403.
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::error::AppError;
use crate::models::{CurrentUser, NewOrder, Order, OrderInput, PageQuery};
use crate::policy::{self, Action};
use crate::store::Store;
use crate::validation;
use crate::AppState;

const DRAIN_PAGE_SIZE: i64 = 3;

/// `POST /api/v1/orders` — Customer. The owner is always the authenticated
/// principal; nothing in the body can redirect it.
pub async fn create_order<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<OrderInput>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::CreateOrder)?;
    validation::validate_order(&input)?;

    let order = state
        .store
        .create_order(&NewOrder {
            user_id: user.id,
            status: input.status,
            total_price: input.total_price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/v1/orders/{id}` — Customer, own orders only
pub async fn get_order<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ReadOrder)?;

    let order = state
        .store
        .order_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if order.user_id != user.id {
        return Err(AppError::Forbidden(
            "Not allowed to read this order".to_string(),
        ));
    }

    Ok(Json(order))
}

/// `GET /api/v1/orders` — Admin paged listing
pub async fn page_of_orders<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ListOrders)?;

    let (limit, page) = validation::normalize_page(params.page, params.limit);
    let orders = state.store.orders_page(limit, page).await?;
    Ok(Json(orders))
}

/// `GET /api/v2/orders/all` — Admin bulk listing
pub async fn all_orders<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ListAllOrders)?;

    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let orders = state.store.orders_page(DRAIN_PAGE_SIZE, page).await?;
        let count = orders.len();
        all.extend(orders);
        if (count as i64) < DRAIN_PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(Json(all))
}

/// `PUT /api/v1/orders/{id}` — Customer, own orders only. The owner is
/// preserved from the stored order, never taken from the body.
pub async fn update_order<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(input): Json<OrderInput>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::UpdateOrder)?;

    let existing = state
        .store
        .order_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if existing.user_id != user.id {
        return Err(AppError::Forbidden(
            "Not allowed to update this order".to_string(),
        ));
    }

    validation::validate_order(&input)?;

    let updated = Order {
        id,
        user_id: existing.user_id,
        status: input.status,
        total_price: input.total_price,
    };
    state.store.update_order(&updated).await?;

    Ok(Json(updated))
}

/// `DELETE /api/v1/orders/{id}` — Admin, any order
pub async fn delete_order<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::DeleteOrder)?;

    state
        .store
        .order_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    state.store.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
