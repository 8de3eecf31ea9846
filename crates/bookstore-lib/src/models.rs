// ============================
// bookstore-lib/src/models.rs
// ============================
//! Domain records and request/response payloads.
use serde::{Deserialize, Serialize};

use crate::policy::Role;

/// A stored account. The password hash never leaves the server: it is
/// skipped on serialization, so no response shape can leak it.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

/// The identity resolved from a valid token, attached to the request by the
/// auth middleware and dropped when the request completes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: i64,
}

/// Book payload for create/update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub total_price: i64,
}

/// Order payload for create/update requests. Deliberately has no owner
/// field: the owning identity is always taken from the authenticated
/// principal, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    pub status: String,
    pub total_price: i64,
}

/// A new order as handed to the store, owner already resolved.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub status: String,
    pub total_price: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Free-form on the wire, validated against the closed role set.
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub role: String,
    /// When omitted, the stored password hash is kept as-is.
    pub password: Option<String>,
}

/// Pagination query parameters shared by the paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
