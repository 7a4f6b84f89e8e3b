//! User entity model and DTOs.

use std::cmp::Ordering;

use crackmes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub visible: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: Timestamp,
}

impl User {
    /// Ordering key for user listings: byte-wise by name.
    ///
    /// Matches `ORDER BY name COLLATE "C"` so every store returns the same
    /// order.
    pub fn name_order(a: &User, b: &User) -> Ordering {
        a.name.as_bytes().cmp(b.name.as_bytes())
    }
}

/// DTO for creating a new user. `password` is an already-hashed value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}
