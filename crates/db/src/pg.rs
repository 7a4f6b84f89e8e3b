//! PostgreSQL-backed [`EntityStore`](crate::store::EntityStore).

use async_trait::async_trait;
use crackmes_core::error::CoreError;
use crackmes_core::hex_id;
use crackmes_core::rating::RatingKind;
use crackmes_core::types::DbId;

use crate::error::db_error;
use crate::models::comment::{Comment, CreateComment};
use crate::models::crackme::{CreateCrackme, Crackme};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::rating::{CreateRating, Rating, RatingSummary};
use crate::models::solution::{CreateSolution, Solution};
use crate::models::user::{CreateUser, User};
use crate::repositories::{
    CommentRepo, CrackmeRepo, NotificationRepo, RatingRepo, SolutionRepo, UserRepo,
};
use crate::store::{
    CommentStore, CrackmeStore, HealthStore, NotificationStore, RatingStore, SolutionStore,
    StoreResult, UserStore,
};
use crate::DbPool;

/// Entity Store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn found<T>(row: Option<T>, entity: &'static str, key: &str) -> StoreResult<T> {
    row.ok_or_else(|| CoreError::not_found(entity, key))
}

fn touched(updated: bool, entity: &'static str, key: &str) -> StoreResult<()> {
    if updated {
        Ok(())
    } else {
        Err(CoreError::not_found(entity, key))
    }
}

#[async_trait]
impl HealthStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await.map_err(db_error)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        UserRepo::create(&self.pool, &hex_id::generate(), input)
            .await
            .map_err(db_error)
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<User> {
        let row = UserRepo::find_by_name(&self.pool, name)
            .await
            .map_err(db_error)?;
        found(row, "User", name)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(db_error)?;
        found(row, "User", email)
    }

    async fn list_visible_users(&self) -> StoreResult<Vec<User>> {
        let mut users = UserRepo::list_visible(&self.pool)
            .await
            .map_err(db_error)?;
        users.sort_by(User::name_order);
        Ok(users)
    }

    async fn count_visible_users(&self) -> StoreResult<i64> {
        UserRepo::count_visible(&self.pool).await.map_err(db_error)
    }
}

#[async_trait]
impl CrackmeStore for PgStore {
    async fn create_crackme(&self, input: &CreateCrackme) -> StoreResult<Crackme> {
        CrackmeRepo::create(&self.pool, input).await.map_err(db_error)
    }

    async fn find_crackme_by_hexid(&self, hexid: &str) -> StoreResult<Crackme> {
        let row = CrackmeRepo::find_by_hexid(&self.pool, hexid)
            .await
            .map_err(db_error)?;
        found(row, "Crackme", hexid)
    }

    async fn list_visible_crackmes_by_author(&self, author: &str) -> StoreResult<Vec<Crackme>> {
        CrackmeRepo::list_visible_by_author(&self.pool, author)
            .await
            .map_err(db_error)
    }

    async fn list_crackme_hexids(&self) -> StoreResult<Vec<String>> {
        CrackmeRepo::list_hexids(&self.pool).await.map_err(db_error)
    }

    async fn count_visible_crackmes_by_author(&self, author: &str) -> StoreResult<i64> {
        CrackmeRepo::count_visible_by_author(&self.pool, author)
            .await
            .map_err(db_error)
    }

    async fn count_visible_crackmes(&self) -> StoreResult<i64> {
        CrackmeRepo::count_visible(&self.pool).await.map_err(db_error)
    }

    async fn approve_crackme(&self, hexid: &str) -> StoreResult<Option<Crackme>> {
        CrackmeRepo::approve(&self.pool, hexid).await.map_err(db_error)
    }

    async fn delete_crackme(&self, hexid: &str) -> StoreResult<bool> {
        CrackmeRepo::soft_delete(&self.pool, hexid)
            .await
            .map_err(db_error)
    }

    async fn increment_crackme_solutions(&self, hexid: &str) -> StoreResult<()> {
        let updated = CrackmeRepo::increment_solutions(&self.pool, hexid)
            .await
            .map_err(db_error)?;
        touched(updated, "Crackme", hexid)
    }

    async fn increment_crackme_comments(&self, hexid: &str) -> StoreResult<()> {
        let updated = CrackmeRepo::increment_comments(&self.pool, hexid)
            .await
            .map_err(db_error)?;
        touched(updated, "Crackme", hexid)
    }

    async fn set_crackme_counts(
        &self,
        hexid: &str,
        nb_solutions: i64,
        nb_comments: i64,
    ) -> StoreResult<()> {
        let updated = CrackmeRepo::set_counts(&self.pool, hexid, nb_solutions, nb_comments)
            .await
            .map_err(db_error)?;
        touched(updated, "Crackme", hexid)
    }

    async fn set_crackme_rating(
        &self,
        hexid: &str,
        kind: RatingKind,
        average: f64,
    ) -> StoreResult<()> {
        let updated = CrackmeRepo::set_rating(&self.pool, hexid, kind, average)
            .await
            .map_err(db_error)?;
        touched(updated, "Crackme", hexid)
    }
}

#[async_trait]
impl SolutionStore for PgStore {
    async fn create_solution(&self, input: &CreateSolution) -> StoreResult<Solution> {
        SolutionRepo::create(&self.pool, input)
            .await
            .map_err(db_error)
    }

    async fn find_solution_by_hexid(&self, hexid: &str) -> StoreResult<Solution> {
        let row = SolutionRepo::find_by_hexid(&self.pool, hexid)
            .await
            .map_err(db_error)?;
        found(row, "Solution", hexid)
    }

    async fn has_live_solution(&self, author: &str, crackme_id: DbId) -> StoreResult<bool> {
        SolutionRepo::exists_live(&self.pool, author, crackme_id)
            .await
            .map_err(db_error)
    }

    async fn list_visible_solutions_for_crackme(
        &self,
        crackme_id: DbId,
    ) -> StoreResult<Vec<Solution>> {
        SolutionRepo::list_visible_for_crackme(&self.pool, crackme_id)
            .await
            .map_err(db_error)
    }

    async fn list_visible_solutions_by_author(&self, author: &str) -> StoreResult<Vec<Solution>> {
        SolutionRepo::list_visible_by_author(&self.pool, author)
            .await
            .map_err(db_error)
    }

    async fn count_visible_solutions_for_crackme(&self, crackme_id: DbId) -> StoreResult<i64> {
        SolutionRepo::count_visible_for_crackme(&self.pool, crackme_id)
            .await
            .map_err(db_error)
    }

    async fn count_visible_solutions_by_author(&self, author: &str) -> StoreResult<i64> {
        SolutionRepo::count_visible_by_author(&self.pool, author)
            .await
            .map_err(db_error)
    }

    async fn estimate_solution_total(&self) -> StoreResult<i64> {
        SolutionRepo::estimate_total(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn approve_solution(&self, hexid: &str) -> StoreResult<Option<Solution>> {
        SolutionRepo::approve(&self.pool, hexid)
            .await
            .map_err(db_error)
    }

    async fn delete_solution(&self, hexid: &str) -> StoreResult<bool> {
        SolutionRepo::soft_delete(&self.pool, hexid)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        CommentRepo::create(&self.pool, &hex_id::generate(), input)
            .await
            .map_err(db_error)
    }

    async fn find_comment_by_hexid(&self, hexid: &str) -> StoreResult<Comment> {
        let row = CommentRepo::find_by_hexid(&self.pool, hexid)
            .await
            .map_err(db_error)?;
        found(row, "Comment", hexid)
    }

    async fn list_visible_comments_for_crackme(
        &self,
        crackme_hexid: &str,
    ) -> StoreResult<Vec<Comment>> {
        CommentRepo::list_visible_for_crackme(&self.pool, crackme_hexid)
            .await
            .map_err(db_error)
    }

    async fn count_visible_comments_for_crackme(&self, crackme_hexid: &str) -> StoreResult<i64> {
        CommentRepo::count_visible_for_crackme(&self.pool, crackme_hexid)
            .await
            .map_err(db_error)
    }

    async fn count_visible_comments_by_author(&self, author: &str) -> StoreResult<i64> {
        CommentRepo::count_visible_by_author(&self.pool, author)
            .await
            .map_err(db_error)
    }

    async fn delete_comment(&self, hexid: &str) -> StoreResult<bool> {
        CommentRepo::soft_delete(&self.pool, hexid)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl RatingStore for PgStore {
    async fn create_rating(&self, input: &CreateRating) -> StoreResult<Rating> {
        RatingRepo::create(&self.pool, &hex_id::generate(), input)
            .await
            .map_err(db_error)
    }

    async fn has_rating(
        &self,
        kind: RatingKind,
        author: &str,
        crackme_hexid: &str,
    ) -> StoreResult<bool> {
        RatingRepo::exists_live(&self.pool, kind, author, crackme_hexid)
            .await
            .map_err(db_error)
    }

    async fn rating_summary(
        &self,
        kind: RatingKind,
        crackme_hexid: &str,
    ) -> StoreResult<RatingSummary> {
        RatingRepo::summary(&self.pool, kind, crackme_hexid)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        NotificationRepo::create(&self.pool, &hex_id::generate(), input)
            .await
            .map_err(db_error)
    }

    async fn list_notifications(&self, recipient: &str) -> StoreResult<Vec<Notification>> {
        NotificationRepo::list_for_recipient(&self.pool, recipient)
            .await
            .map_err(db_error)
    }

    async fn count_unseen_notifications(&self, recipient: &str) -> StoreResult<i64> {
        NotificationRepo::count_unseen(&self.pool, recipient)
            .await
            .map_err(db_error)
    }

    async fn mark_notifications_seen(&self, recipient: &str) -> StoreResult<u64> {
        NotificationRepo::mark_all_seen(&self.pool, recipient)
            .await
            .map_err(db_error)
    }

    async fn delete_notification(&self, recipient: &str, hexid: &str) -> StoreResult<bool> {
        NotificationRepo::delete(&self.pool, recipient, hexid)
            .await
            .map_err(db_error)
    }
}
