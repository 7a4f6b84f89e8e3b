//! Solution entity model and DTOs.

use crackmes_core::types::{DbId, Timestamp};
use crackmes_core::visibility::Visibility;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `solutions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Solution {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    #[serde(skip_serializing)]
    pub crackme_id: DbId,
    pub crackme_hexid: String,
    pub crackme_name: String,
    pub author: String,
    /// Write-up describing the approach.
    pub info: String,
    pub filename: String,
    pub visible: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: Timestamp,
}

impl Solution {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_flags(self.visible, self.deleted)
    }
}

/// DTO for creating a new solution.
#[derive(Debug, Clone)]
pub struct CreateSolution {
    pub hexid: String,
    pub crackme_id: DbId,
    pub crackme_hexid: String,
    pub crackme_name: String,
    pub author: String,
    pub info: String,
    pub filename: String,
}
