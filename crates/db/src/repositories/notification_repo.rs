//! Repository for the `notifications` table.
//!
//! Every mutation is scoped to the recipient; a caller can never touch
//! another user's notifications.

use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, hexid, recipient, message, seen, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification, returning the created row.
    pub async fn create(
        pool: &PgPool,
        hexid: &str,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (hexid, recipient, message) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(hexid)
            .bind(&input.recipient)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// List a recipient's notifications, newest first.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient: &str,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient)
            .fetch_all(pool)
            .await
    }

    pub async fn count_unseen(pool: &PgPool, recipient: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient = $1 AND seen = false",
        )
        .bind(recipient)
        .fetch_one(pool)
        .await
    }

    /// Mark every unseen notification of a recipient as seen.
    ///
    /// Returns the number of rows updated.
    pub async fn mark_all_seen(pool: &PgPool, recipient: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET seen = true WHERE recipient = $1 AND seen = false",
        )
        .bind(recipient)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete one notification owned by `recipient`.
    ///
    /// Returns `false` if no such notification exists for that recipient.
    pub async fn delete(pool: &PgPool, recipient: &str, hexid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient = $1 AND hexid = $2")
            .bind(recipient)
            .bind(hexid)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
