//! Comment entity model and DTOs.

use crackmes_core::types::{DbId, Timestamp};
use crackmes_core::visibility::Visibility;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    pub content: String,
    pub author: String,
    pub crackme_hexid: String,
    pub crackme_name: String,
    pub visible: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_flags(self.visible, self.deleted)
    }
}

/// DTO for creating a new comment. The store assigns the hex id.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub content: String,
    pub author: String,
    pub crackme_hexid: String,
    pub crackme_name: String,
}
