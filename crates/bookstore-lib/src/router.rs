// ============================
// bookstore-lib/src/router.rs
// ============================
//! HTTP router assembly.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::auth::require_auth;
use crate::store::Store;
use crate::AppState;

/// Build the application router.
///
/// Public routes: health, register, login, and book reads. Everything else
/// sits behind the authentication middleware; role checks happen inside
/// the handlers via the policy table.
pub fn create_router<S: Store + Clone + Send + Sync + 'static>(
    state: Arc<AppState<S>>,
) -> Router {
    let public: Router<Arc<AppState<S>>> = Router::new()
        .route("/api/v1/ping", get(ping))
        .route("/api/v1/auth/register", post(handlers::auth::register::<S>))
        .route("/api/v1/auth/login", post(handlers::auth::login::<S>))
        .route("/api/v1/books", get(handlers::books::page_of_books::<S>))
        .route("/api/v1/books/{id}", get(handlers::books::get_book::<S>));

    let protected: Router<Arc<AppState<S>>> = Router::new()
        .route("/api/v1/books", post(handlers::books::create_book::<S>))
        .route("/api/v1/books/{id}", put(handlers::books::update_book::<S>))
        .route(
            "/api/v1/books/{id}",
            delete(handlers::books::delete_book::<S>),
        )
        .route("/api/v2/books/all", get(handlers::books::all_books::<S>))
        .route("/api/v1/orders", post(handlers::orders::create_order::<S>))
        .route("/api/v1/orders", get(handlers::orders::page_of_orders::<S>))
        .route("/api/v1/orders/{id}", get(handlers::orders::get_order::<S>))
        .route(
            "/api/v1/orders/{id}",
            put(handlers::orders::update_order::<S>),
        )
        .route(
            "/api/v1/orders/{id}",
            delete(handlers::orders::delete_order::<S>),
        )
        .route("/api/v2/orders/all", get(handlers::orders::all_orders::<S>))
        .route("/api/v1/users", get(handlers::users::page_of_users::<S>))
        .route("/api/v1/users/{id}", get(handlers::users::get_user::<S>))
        .route("/api/v1/users/{id}", put(handlers::users::update_user::<S>))
        .route(
            "/api/v1/users/{id}",
            delete(handlers::users::delete_user::<S>),
        )
        .route("/api/v2/users/all", get(handlers::users::all_users::<S>))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /api/v1/ping`
async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "status": 200, "version": "v1" }))
}
