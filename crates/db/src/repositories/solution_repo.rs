//! Repository for the `solutions` table.

use crackmes_core::types::DbId;
use sqlx::PgPool;

use crate::models::solution::{CreateSolution, Solution};

/// Column list for `solutions` queries.
const COLUMNS: &str = "id, hexid, crackme_id, crackme_hexid, crackme_name, author, info, \
    filename, visible, deleted, created_at";

/// Provides CRUD operations for solutions.
pub struct SolutionRepo;

impl SolutionRepo {
    /// Insert a new pending solution, returning the created row.
    ///
    /// A second live solution for the same (author, crackme) violates
    /// `uq_solutions_author_crackme_live`.
    pub async fn create(pool: &PgPool, input: &CreateSolution) -> Result<Solution, sqlx::Error> {
        let query = format!(
            "INSERT INTO solutions \
                (hexid, crackme_id, crackme_hexid, crackme_name, author, info, filename) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(&input.hexid)
            .bind(input.crackme_id)
            .bind(&input.crackme_hexid)
            .bind(&input.crackme_name)
            .bind(&input.author)
            .bind(&input.info)
            .bind(&input.filename)
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted solution by hex id, pending or visible.
    pub async fn find_by_hexid(
        pool: &PgPool,
        hexid: &str,
    ) -> Result<Option<Solution>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM solutions WHERE hexid = $1 AND deleted = false");
        sqlx::query_as::<_, Solution>(&query)
            .bind(hexid)
            .fetch_optional(pool)
            .await
    }

    /// Whether `author` already has a pending or visible solution for the crackme.
    pub async fn exists_live(
        pool: &PgPool,
        author: &str,
        crackme_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM solutions \
                WHERE author = $1 AND crackme_id = $2 AND deleted = false)",
        )
        .bind(author)
        .bind(crackme_id)
        .fetch_one(pool)
        .await
    }

    /// List visible solutions for a crackme, oldest first.
    pub async fn list_visible_for_crackme(
        pool: &PgPool,
        crackme_id: DbId,
    ) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solutions \
             WHERE crackme_id = $1 AND visible = true AND deleted = false \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(crackme_id)
            .fetch_all(pool)
            .await
    }

    /// List visible solutions by an author, newest first.
    pub async fn list_visible_by_author(
        pool: &PgPool,
        author: &str,
    ) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solutions \
             WHERE author = $1 AND visible = true AND deleted = false \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(author)
            .fetch_all(pool)
            .await
    }

    /// Exact count of visible solutions for a crackme.
    pub async fn count_visible_for_crackme(
        pool: &PgPool,
        crackme_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM solutions \
             WHERE crackme_id = $1 AND visible = true AND deleted = false",
        )
        .bind(crackme_id)
        .fetch_one(pool)
        .await
    }

    /// Exact count of visible solutions by an author.
    pub async fn count_visible_by_author(pool: &PgPool, author: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM solutions \
             WHERE author = $1 AND visible = true AND deleted = false",
        )
        .bind(author)
        .fetch_one(pool)
        .await
    }

    /// Planner estimate of the number of rows in `solutions`.
    ///
    /// Reads `pg_class.reltuples` instead of scanning. Counts every row,
    /// including pending and deleted ones, and lags until the next
    /// ANALYZE. Display only: never feed this into the crackme counters.
    pub async fn estimate_total(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let estimate: Option<i64> = sqlx::query_scalar(
            "SELECT GREATEST(reltuples, 0)::BIGINT FROM pg_class \
             WHERE oid = 'solutions'::regclass",
        )
        .fetch_optional(pool)
        .await?;
        Ok(estimate.unwrap_or(0))
    }

    /// Move a pending solution to visible.
    ///
    /// Returns `None` when the row is not pending.
    pub async fn approve(pool: &PgPool, hexid: &str) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!(
            "UPDATE solutions SET visible = true \
             WHERE hexid = $1 AND visible = false AND deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(hexid)
            .fetch_optional(pool)
            .await
    }

    /// Mark a solution deleted. Returns `true` if a live row was updated.
    pub async fn soft_delete(pool: &PgPool, hexid: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE solutions SET deleted = true WHERE hexid = $1 AND deleted = false")
                .bind(hexid)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
