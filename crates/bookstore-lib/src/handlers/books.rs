// ============================
// bookstore-lib/src/handlers/books.rs
// ============================
//! Book CRUD handlers.
//!
//! Reads of single books and pages of books are public. Everything else is
//! Admin-gated through the policy table.
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::error::AppError;
use crate::models::{Book, BookInput, CurrentUser, PageQuery};
use crate::policy::{self, Action};
use crate::store::Store;
use crate::validation;
use crate::AppState;

/// Page size used when draining the full table for the bulk listing
const DRAIN_PAGE_SIZE: i64 = 3;

/// `POST /api/v1/books` — Admin
pub async fn create_book<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<BookInput>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::CreateBook)?;
    validation::validate_book(&input)?;

    let book = state.store.create_book(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /api/v1/books/{id}` — public
pub async fn get_book<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let book = state
        .store
        .book_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Book"))?;

    Ok(Json(book))
}

/// `GET /api/v1/books` — public paged listing
pub async fn page_of_books<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, page) = validation::normalize_page(params.page, params.limit);
    let books = state.store.books_page(limit, page).await?;
    Ok(Json(books))
}

/// `GET /api/v2/books/all` — Admin bulk listing, drained page by page
pub async fn all_books<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::ListAllBooks)?;

    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let books = state.store.books_page(DRAIN_PAGE_SIZE, page).await?;
        let count = books.len();
        all.extend(books);
        if (count as i64) < DRAIN_PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(Json(all))
}

/// `PUT /api/v1/books/{id}` — Admin
pub async fn update_book<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(input): Json<BookInput>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::UpdateBook)?;

    state
        .store
        .book_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Book"))?;

    validation::validate_book(&input)?;

    let updated = Book {
        id,
        title: input.title,
        author: input.author,
        price: input.price,
    };
    state.store.update_book(&updated).await?;

    Ok(Json(updated))
}

/// `DELETE /api/v1/books/{id}` — Admin
pub async fn delete_book<S: Store + Clone + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(user.role, Action::DeleteBook)?;

    state.store.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
