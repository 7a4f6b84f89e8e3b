//! Repository for the `comments` table.

use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list for `comments` queries.
const COLUMNS: &str =
    "id, hexid, content, author, crackme_hexid, crackme_name, visible, deleted, created_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new (immediately visible) comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        hexid: &str,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (hexid, content, author, crackme_hexid, crackme_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(hexid)
            .bind(&input.content)
            .bind(&input.author)
            .bind(&input.crackme_hexid)
            .bind(&input.crackme_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_hexid(pool: &PgPool, hexid: &str) -> Result<Option<Comment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE hexid = $1 AND deleted = false");
        sqlx::query_as::<_, Comment>(&query)
            .bind(hexid)
            .fetch_optional(pool)
            .await
    }

    /// List visible comments on a crackme, oldest first.
    pub async fn list_visible_for_crackme(
        pool: &PgPool,
        crackme_hexid: &str,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE crackme_hexid = $1 AND visible = true AND deleted = false \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(crackme_hexid)
            .fetch_all(pool)
            .await
    }

    pub async fn count_visible_for_crackme(
        pool: &PgPool,
        crackme_hexid: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments \
             WHERE crackme_hexid = $1 AND visible = true AND deleted = false",
        )
        .bind(crackme_hexid)
        .fetch_one(pool)
        .await
    }

    pub async fn count_visible_by_author(pool: &PgPool, author: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments \
             WHERE author = $1 AND visible = true AND deleted = false",
        )
        .bind(author)
        .fetch_one(pool)
        .await
    }

    /// Mark a comment deleted. Returns `true` if a live row was updated.
    pub async fn soft_delete(pool: &PgPool, hexid: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE comments SET deleted = true WHERE hexid = $1 AND deleted = false")
                .bind(hexid)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
