// ============================
// bookstore-lib/src/store/postgres.rs
// ============================
//! Postgres implementation of the [`Store`] trait.
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::{Book, BookInput, NewOrder, Order, User};
use crate::policy::Role;
use crate::store::Store;

/// Table bootstrap. Not a migration system; just enough schema for a fresh
/// database to serve requests.
const SCHEMA: [&str; 3] = [
    "create table if not exists users (
        user_id bigserial primary key,
        user_email text not null unique,
        user_password text not null,
        user_role text not null
    )",
    "create table if not exists books (
        book_id bigserial primary key,
        book_title text not null,
        book_author text not null,
        book_price bigint not null
    )",
    "create table if not exists orders (
        order_id bigserial primary key,
        order_user_id bigint not null references users (user_id) on delete cascade,
        order_status text not null,
        order_total_price bigint not null
    )",
];

#[derive(FromRow)]
struct UserRow {
    user_id: i64,
    user_email: String,
    user_password: String,
    user_role: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, AppError> {
        let role = Role::parse(&self.user_role).ok_or_else(|| {
            AppError::Internal(format!(
                "user {} has unknown role '{}'",
                self.user_id, self.user_role
            ))
        })?;

        Ok(User {
            id: self.user_id,
            email: self.user_email,
            password_hash: self.user_password,
            role,
        })
    }
}

#[derive(FromRow)]
struct BookRow {
    book_id: i64,
    book_title: String,
    book_author: String,
    book_price: i64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.book_id,
            title: row.book_title,
            author: row.book_author,
            price: row.book_price,
        }
    }
}

#[derive(FromRow)]
struct OrderRow {
    order_id: i64,
    order_user_id: i64,
    order_status: String,
    order_total_price: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.order_id,
            user_id: row.order_user_id,
            status: row.order_status,
            total_price: row.order_total_price,
        }
    }
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database named by `url`
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return AppError::DuplicateEmail;
        }
    }
    AppError::Database(err)
}

fn page_offset(limit: i64, page: i64) -> i64 {
    (page - 1) * limit
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let row: (i64,) = sqlx::query_as(
            "insert into users (user_email, user_password, user_role)
             values ($1, $2, $3) returning user_id",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(User {
            id: row.0,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        })
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(
            "select user_id, user_email, user_password, user_role
             from users where user_email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(
            "select user_id, user_email, user_password, user_role
             from users where user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "update users set user_email = $1, user_password = $2, user_role = $3
             where user_id = $4",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("delete from users where user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn users_page(&self, limit: i64, page: i64) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "select user_id, user_email, user_password, user_role
             from users order by user_id limit $1 offset $2",
        )
        .bind(limit)
        .bind(page_offset(limit, page))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn create_book(&self, input: &BookInput) -> Result<Book, AppError> {
        let row: (i64,) = sqlx::query_as(
            "insert into books (book_title, book_author, book_price)
             values ($1, $2, $3) returning book_id",
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(Book {
            id: row.0,
            title: input.title.clone(),
            author: input.author.clone(),
            price: input.price,
        })
    }

    async fn book_by_id(&self, id: i64) -> Result<Option<Book>, AppError> {
        let row: Option<BookRow> = sqlx::query_as(
            "select book_id, book_title, book_author, book_price
             from books where book_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    async fn update_book(&self, book: &Book) -> Result<(), AppError> {
        sqlx::query(
            "update books set book_title = $1, book_author = $2, book_price = $3
             where book_id = $4",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_book(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("delete from books where book_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn books_page(&self, limit: i64, page: i64) -> Result<Vec<Book>, AppError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "select book_id, book_title, book_author, book_price
             from books order by book_id limit $1 offset $2",
        )
        .bind(limit)
        .bind(page_offset(limit, page))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create_order(&self, new: &NewOrder) -> Result<Order, AppError> {
        let row: (i64,) = sqlx::query_as(
            "insert into orders (order_user_id, order_status, order_total_price)
             values ($1, $2, $3) returning order_id",
        )
        .bind(new.user_id)
        .bind(&new.status)
        .bind(new.total_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(Order {
            id: row.0,
            user_id: new.user_id,
            status: new.status.clone(),
            total_price: new.total_price,
        })
    }

    async fn order_by_id(&self, id: i64) -> Result<Option<Order>, AppError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "select order_id, order_user_id, order_status, order_total_price
             from orders where order_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    async fn update_order(&self, order: &Order) -> Result<(), AppError> {
        sqlx::query(
            "update orders set order_user_id = $1, order_status = $2, order_total_price = $3
             where order_id = $4",
        )
        .bind(order.user_id)
        .bind(&order.status)
        .bind(order.total_price)
        .bind(order.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("delete from orders where order_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn orders_page(&self, limit: i64, page: i64) -> Result<Vec<Order>, AppError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "select order_id, order_user_id, order_status, order_total_price
             from orders order by order_id limit $1 offset $2",
        )
        .bind(limit)
        .bind(page_offset(limit, page))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
