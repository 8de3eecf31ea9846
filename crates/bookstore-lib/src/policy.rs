// ============================
// bookstore-lib/src/policy.rs
// ============================
//! Role-based authorization policy.
//!
//! The full permission matrix lives in [`allowed`] so it can be read and
//! tested in one place instead of being re-derived from every handler.
//! Anything not explicitly granted is denied.
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Account role. Closed set, case-sensitive on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Admin => "Admin",
        }
    }

    /// Parse the stored/submitted role tag. Anything outside the closed set
    /// is rejected rather than defaulted.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "Customer" => Some(Role::Customer),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Protected actions. Public reads (single book, paged books) never reach
/// the policy — their routes skip authentication entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBook,
    UpdateBook,
    DeleteBook,
    ListAllBooks,
    CreateOrder,
    ReadOrder,
    UpdateOrder,
    DeleteOrder,
    ListOrders,
    ListAllOrders,
    ReadUser,
    ListUsers,
    ListAllUsers,
    UpdateUser,
    DeleteUser,
}

impl Action {
    /// Human-readable description used in denial messages.
    pub fn describe(self) -> &'static str {
        match self {
            Action::CreateBook => "create a book",
            Action::UpdateBook => "update a book",
            Action::DeleteBook => "delete a book",
            Action::ListAllBooks => "list all books",
            Action::CreateOrder => "create an order",
            Action::ReadOrder => "read an order",
            Action::UpdateOrder => "update an order",
            Action::DeleteOrder => "delete an order",
            Action::ListOrders => "list orders",
            Action::ListAllOrders => "list all orders",
            Action::ReadUser => "read a user",
            Action::ListUsers => "list users",
            Action::ListAllUsers => "list all users",
            Action::UpdateUser => "update a user",
            Action::DeleteUser => "delete a user",
        }
    }
}

/// The permission matrix. Default-deny: any (role, action) pair not listed
/// here is disallowed.
pub fn allowed(role: Role, action: Action) -> bool {
    use Action::*;
    use Role::*;

    matches!(
        (role, action),
        (Admin, CreateBook | UpdateBook | DeleteBook | ListAllBooks)
            | (Customer, CreateOrder | ReadOrder | UpdateOrder)
            | (Admin, DeleteOrder | ListOrders | ListAllOrders)
            | (Admin, ReadUser | ListUsers | ListAllUsers | UpdateUser | DeleteUser)
    )
}

/// Policy check as used by the handlers: a denial becomes a 403 with a
/// message naming the action, never the resource state.
pub fn authorize(role: Role, action: Action) -> Result<(), AppError> {
    if allowed(role, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Not allowed to {}",
            action.describe()
        )))
    }
}
