// ============================
// bookstore-lib/src/store/memory.rs
// ============================
//! In-memory implementation of the [`Store`] trait, used by the test
//! suites and handy for local development without a database.
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Book, BookInput, NewOrder, Order, User};
use crate::policy::Role;
use crate::store::Store;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    books: BTreeMap<i64, Book>,
    orders: BTreeMap<i64, Order>,
    next_user_id: i64,
    next_book_id: i64,
    next_order_id: i64,
}

/// In-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_slice<T: Clone>(table: &BTreeMap<i64, T>, limit: i64, page: i64) -> Vec<T> {
    let offset = ((page - 1) * limit).max(0) as usize;
    table
        .values()
        .skip(offset)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut tables = self.inner.write().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;

        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AppError::DuplicateEmail);
        }

        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;
        tables.users.remove(&id);
        tables.orders.retain(|_, order| order.user_id != id);
        Ok(())
    }

    async fn users_page(&self, limit: i64, page: i64) -> Result<Vec<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(page_slice(&tables.users, limit, page))
    }

    async fn create_book(&self, input: &BookInput) -> Result<Book, AppError> {
        let mut tables = self.inner.write().await;
        tables.next_book_id += 1;
        let book = Book {
            id: tables.next_book_id,
            title: input.title.clone(),
            author: input.author.clone(),
            price: input.price,
        };
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn book_by_id(&self, id: i64) -> Result<Option<Book>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.books.get(&id).cloned())
    }

    async fn update_book(&self, book: &Book) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;
        tables.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn delete_book(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;
        tables.books.remove(&id);
        Ok(())
    }

    async fn books_page(&self, limit: i64, page: i64) -> Result<Vec<Book>, AppError> {
        let tables = self.inner.read().await;
        Ok(page_slice(&tables.books, limit, page))
    }

    async fn create_order(&self, new: &NewOrder) -> Result<Order, AppError> {
        let mut tables = self.inner.write().await;
        tables.next_order_id += 1;
        let order = Order {
            id: tables.next_order_id,
            user_id: new.user_id,
            status: new.status.clone(),
            total_price: new.total_price,
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn order_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.orders.get(&id).cloned())
    }

    async fn update_order(&self, order: &Order) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;
        tables.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.inner.write().await;
        tables.orders.remove(&id);
        Ok(())
    }

    async fn orders_page(&self, limit: i64, page: i64) -> Result<Vec<Order>, AppError> {
        let tables = self.inner.read().await;
        Ok(page_slice(&tables.orders, limit, page))
    }
}
