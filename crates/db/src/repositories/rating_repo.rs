//! Repository for the `ratings` table.

use crackmes_core::rating::RatingKind;
use sqlx::PgPool;

use crate::models::rating::{CreateRating, Rating, RatingSummary};

/// Column list for `ratings` queries.
const COLUMNS: &str = "id, hexid, kind, author, crackme_hexid, rating, deleted, created_at";

/// Provides create and aggregate operations for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a new rating, returning the created row.
    ///
    /// A second live rating of the same kind by the same author violates
    /// `uq_ratings_kind_author_crackme_live`.
    pub async fn create(
        pool: &PgPool,
        hexid: &str,
        input: &CreateRating,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (hexid, kind, author, crackme_hexid, rating) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(hexid)
            .bind(input.kind.name())
            .bind(&input.author)
            .bind(&input.crackme_hexid)
            .bind(input.rating)
            .fetch_one(pool)
            .await
    }

    /// Whether `author` already has a live rating of `kind` for the crackme.
    pub async fn exists_live(
        pool: &PgPool,
        kind: RatingKind,
        author: &str,
        crackme_hexid: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM ratings \
                WHERE kind = $1 AND author = $2 AND crackme_hexid = $3 AND deleted = false)",
        )
        .bind(kind.name())
        .bind(author)
        .bind(crackme_hexid)
        .fetch_one(pool)
        .await
    }

    /// Mean and count of the live ratings of `kind` for a crackme.
    pub async fn summary(
        pool: &PgPool,
        kind: RatingKind,
        crackme_hexid: &str,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT COALESCE(AVG(rating), 0)::DOUBLE PRECISION AS average, COUNT(*) AS count \
             FROM ratings \
             WHERE kind = $1 AND crackme_hexid = $2 AND deleted = false",
        )
        .bind(kind.name())
        .bind(crackme_hexid)
        .fetch_one(pool)
        .await
    }
}
