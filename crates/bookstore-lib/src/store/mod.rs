// ============================
// bookstore-lib/src/store/mod.rs
// ============================
//! Persistence abstraction over users, books, and orders.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Book, BookInput, NewOrder, Order, User};
use crate::policy::Role;

/// Trait for persistence backends.
///
/// Paged listings take `(limit, page)` with 1-based pages; callers are
/// expected to normalize the values first (`validation::normalize_page`).
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn update_user(&self, user: &User) -> Result<(), AppError>;
    async fn delete_user(&self, id: i64) -> Result<(), AppError>;
    async fn users_page(&self, limit: i64, page: i64) -> Result<Vec<User>, AppError>;

    // books
    async fn create_book(&self, input: &BookInput) -> Result<Book, AppError>;
    async fn book_by_id(&self, id: i64) -> Result<Option<Book>, AppError>;
    async fn update_book(&self, book: &Book) -> Result<(), AppError>;
    async fn delete_book(&self, id: i64) -> Result<(), AppError>;
    async fn books_page(&self, limit: i64, page: i64) -> Result<Vec<Book>, AppError>;

    // orders
    async fn create_order(&self, new: &NewOrder) -> Result<Order, AppError>;
    async fn order_by_id(&self, id: i64) -> Result<Option<Order>, AppError>;
    async fn update_order(&self, order: &Order) -> Result<(), AppError>;
    async fn delete_order(&self, id: i64) -> Result<(), AppError>;
    async fn orders_page(&self, limit: i64, page: i64) -> Result<Vec<Order>, AppError>;
}
