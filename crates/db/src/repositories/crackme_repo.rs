//! Repository for the `crackmes` table, including the denormalized
//! `nb_solutions` / `nb_comments` counters and the cached rating averages.

use crackmes_core::rating::RatingKind;
use crackmes_core::types::DbId;
use sqlx::PgPool;

use crate::models::crackme::{CreateCrackme, Crackme};

/// Column list for `crackmes` queries.
const COLUMNS: &str = "id, hexid, name, author, info, lang, arch, platform, difficulty, \
    quality, filename, visible, deleted, nb_solutions, nb_comments, created_at";

/// Provides CRUD and counter operations for crackmes.
pub struct CrackmeRepo;

impl CrackmeRepo {
    /// Insert a new pending crackme, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCrackme) -> Result<Crackme, sqlx::Error> {
        let query = format!(
            "INSERT INTO crackmes (hexid, name, author, info, lang, arch, platform, filename) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Crackme>(&query)
            .bind(&input.hexid)
            .bind(&input.name)
            .bind(&input.author)
            .bind(&input.info)
            .bind(&input.lang)
            .bind(&input.arch)
            .bind(&input.platform)
            .bind(&input.filename)
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted crackme by hex id, pending or visible.
    pub async fn find_by_hexid(pool: &PgPool, hexid: &str) -> Result<Option<Crackme>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM crackmes WHERE hexid = $1 AND deleted = false");
        sqlx::query_as::<_, Crackme>(&query)
            .bind(hexid)
            .fetch_optional(pool)
            .await
    }

    /// List visible crackmes by an author, newest first.
    pub async fn list_visible_by_author(
        pool: &PgPool,
        author: &str,
    ) -> Result<Vec<Crackme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crackmes \
             WHERE author = $1 AND visible = true AND deleted = false \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Crackme>(&query)
            .bind(author)
            .fetch_all(pool)
            .await
    }

    /// Hex ids of every non-deleted crackme, oldest first.
    pub async fn list_hexids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT hexid FROM crackmes WHERE deleted = false ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Count visible crackmes by an author.
    pub async fn count_visible_by_author(pool: &PgPool, author: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM crackmes \
             WHERE author = $1 AND visible = true AND deleted = false",
        )
        .bind(author)
        .fetch_one(pool)
        .await
    }

    /// Count all visible crackmes.
    pub async fn count_visible(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM crackmes WHERE visible = true AND deleted = false")
            .fetch_one(pool)
            .await
    }

    /// Move a pending crackme to visible.
    ///
    /// Returns `None` when the row is not pending, so two concurrent
    /// approvals yield exactly one transition.
    pub async fn approve(pool: &PgPool, hexid: &str) -> Result<Option<Crackme>, sqlx::Error> {
        let query = format!(
            "UPDATE crackmes SET visible = true \
             WHERE hexid = $1 AND visible = false AND deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Crackme>(&query)
            .bind(hexid)
            .fetch_optional(pool)
            .await
    }

    /// Mark a crackme deleted together with its solutions, comments and
    /// ratings. Returns `true` if a live crackme was updated.
    ///
    /// Runs in one transaction so no child outlives its parent.
    pub async fn soft_delete(pool: &PgPool, hexid: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: Option<DbId> = sqlx::query_scalar(
            "UPDATE crackmes SET deleted = true \
             WHERE hexid = $1 AND deleted = false \
             RETURNING id",
        )
        .bind(hexid)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(id) = id else {
            return Ok(false);
        };

        sqlx::query("UPDATE solutions SET deleted = true WHERE crackme_id = $1 AND deleted = false")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE comments SET deleted = true WHERE crackme_hexid = $1 AND deleted = false",
        )
        .bind(hexid)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE ratings SET deleted = true WHERE crackme_hexid = $1 AND deleted = false")
            .bind(hexid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Atomically add one to `nb_solutions`.
    pub async fn increment_solutions(pool: &PgPool, hexid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE crackmes SET nb_solutions = nb_solutions + 1 \
             WHERE hexid = $1 AND deleted = false",
        )
        .bind(hexid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically add one to `nb_comments`.
    pub async fn increment_comments(pool: &PgPool, hexid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE crackmes SET nb_comments = nb_comments + 1 \
             WHERE hexid = $1 AND deleted = false",
        )
        .bind(hexid)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite both counters. Repair task only.
    pub async fn set_counts(
        pool: &PgPool,
        hexid: &str,
        nb_solutions: i64,
        nb_comments: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE crackmes SET nb_solutions = $2, nb_comments = $3 \
             WHERE hexid = $1 AND deleted = false",
        )
        .bind(hexid)
        .bind(nb_solutions)
        .bind(nb_comments)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the cached average for one rating kind.
    pub async fn set_rating(
        pool: &PgPool,
        hexid: &str,
        kind: RatingKind,
        average: f64,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE crackmes SET {column} = $2 WHERE hexid = $1 AND deleted = false",
            column = rating_column(kind)
        );
        let result = sqlx::query(&query)
            .bind(hexid)
            .bind(average)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn rating_column(kind: RatingKind) -> &'static str {
    match kind {
        RatingKind::Difficulty => "difficulty",
        RatingKind::Quality => "quality",
    }
}
