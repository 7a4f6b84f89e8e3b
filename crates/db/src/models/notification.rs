//! Notification entity model and DTOs.

use crackmes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    pub recipient: String,
    pub message: String,
    pub seen: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient: String,
    pub message: String,
}
