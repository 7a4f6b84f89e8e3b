//! Rating entity model and DTOs.

use crackmes_core::rating::RatingKind;
use crackmes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    /// `"difficulty"` or `"quality"`, see [`RatingKind::name`].
    pub kind: String,
    pub author: String,
    pub crackme_hexid: String,
    pub rating: i32,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new rating. The store assigns the hex id.
#[derive(Debug, Clone)]
pub struct CreateRating {
    pub kind: RatingKind,
    pub author: String,
    pub crackme_hexid: String,
    pub rating: i32,
}

/// Mean and number of live ratings of one kind for a crackme.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}
