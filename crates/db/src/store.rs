//! The injected Entity Store.
//!
//! Each collection has its own `*Store` trait; [`EntityStore`] is the
//! union every component receives as `Arc<dyn EntityStore>`. Lookups return
//! `CoreError::NotFound` for missing or deleted records and every method
//! returns `CoreError::Unavailable` when the backing store cannot be
//! reached.
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | `find_*` | `Result<T>` (`NotFound` when absent) |
//! | `list_*` | `Result<Vec<T>>` |
//! | `count_*` / `has_*` | `Result<i64>` / `Result<bool>` |
//! | `approve_*` | `Result<Option<T>>` (`None` when not pending) |
//! | `delete_*` | `Result<bool>` (`true` if a live record was deleted) |

use async_trait::async_trait;
use crackmes_core::error::CoreError;
use crackmes_core::rating::RatingKind;
use crackmes_core::types::DbId;

use crate::models::comment::{Comment, CreateComment};
use crate::models::crackme::{CreateCrackme, Crackme};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::rating::{CreateRating, Rating, RatingSummary};
use crate::models::solution::{CreateSolution, Solution};
use crate::models::user::{CreateUser, User};

pub type StoreResult<T> = Result<T, CoreError>;

#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Succeeds when the backing store answers.
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a visible user. Fails with `Conflict` on a taken name or email.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    /// Exact, case-sensitive name match.
    async fn find_user_by_name(&self, name: &str) -> StoreResult<User>;

    /// Exact, case-sensitive email match.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Visible users ordered by [`User::name_order`].
    async fn list_visible_users(&self) -> StoreResult<Vec<User>>;

    async fn count_visible_users(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait CrackmeStore: Send + Sync {
    async fn create_crackme(&self, input: &CreateCrackme) -> StoreResult<Crackme>;

    /// Pending or visible crackme by hex id.
    async fn find_crackme_by_hexid(&self, hexid: &str) -> StoreResult<Crackme>;

    async fn list_visible_crackmes_by_author(&self, author: &str) -> StoreResult<Vec<Crackme>>;

    /// Hex ids of every non-deleted crackme.
    async fn list_crackme_hexids(&self) -> StoreResult<Vec<String>>;

    async fn count_visible_crackmes_by_author(&self, author: &str) -> StoreResult<i64>;

    async fn count_visible_crackmes(&self) -> StoreResult<i64>;

    /// Conditional `Pending -> Visible`.
    async fn approve_crackme(&self, hexid: &str) -> StoreResult<Option<Crackme>>;

    /// Delete a crackme and, with it, every solution, comment and rating
    /// attached to it.
    async fn delete_crackme(&self, hexid: &str) -> StoreResult<bool>;

    /// Atomically add one to `nb_solutions`. `NotFound` if no live crackme.
    async fn increment_crackme_solutions(&self, hexid: &str) -> StoreResult<()>;

    /// Atomically add one to `nb_comments`. `NotFound` if no live crackme.
    async fn increment_crackme_comments(&self, hexid: &str) -> StoreResult<()>;

    /// Absolute overwrite of both counters. Only the repair task calls this.
    async fn set_crackme_counts(
        &self,
        hexid: &str,
        nb_solutions: i64,
        nb_comments: i64,
    ) -> StoreResult<()>;

    /// Overwrite the cached average for one rating kind.
    async fn set_crackme_rating(&self, hexid: &str, kind: RatingKind, average: f64)
        -> StoreResult<()>;
}

#[async_trait]
pub trait SolutionStore: Send + Sync {
    /// Fails with `Conflict` when the author already has a live solution
    /// for the crackme.
    async fn create_solution(&self, input: &CreateSolution) -> StoreResult<Solution>;

    async fn find_solution_by_hexid(&self, hexid: &str) -> StoreResult<Solution>;

    /// Whether a pending or visible solution exists for (author, crackme).
    async fn has_live_solution(&self, author: &str, crackme_id: DbId) -> StoreResult<bool>;

    async fn list_visible_solutions_for_crackme(&self, crackme_id: DbId)
        -> StoreResult<Vec<Solution>>;

    async fn list_visible_solutions_by_author(&self, author: &str) -> StoreResult<Vec<Solution>>;

    /// Exact count; safe for counter reconciliation.
    async fn count_visible_solutions_for_crackme(&self, crackme_id: DbId) -> StoreResult<i64>;

    async fn count_visible_solutions_by_author(&self, author: &str) -> StoreResult<i64>;

    /// Fast approximate total for display. Never use for counters.
    async fn estimate_solution_total(&self) -> StoreResult<i64>;

    /// Conditional `Pending -> Visible`.
    async fn approve_solution(&self, hexid: &str) -> StoreResult<Option<Solution>>;

    async fn delete_solution(&self, hexid: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Create an immediately visible comment with a fresh hex id.
    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment>;

    async fn find_comment_by_hexid(&self, hexid: &str) -> StoreResult<Comment>;

    async fn list_visible_comments_for_crackme(
        &self,
        crackme_hexid: &str,
    ) -> StoreResult<Vec<Comment>>;

    /// Exact count; safe for counter reconciliation.
    async fn count_visible_comments_for_crackme(&self, crackme_hexid: &str) -> StoreResult<i64>;

    async fn count_visible_comments_by_author(&self, author: &str) -> StoreResult<i64>;

    async fn delete_comment(&self, hexid: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Fails with `Conflict` when the author already has a live rating of
    /// the same kind for the crackme.
    async fn create_rating(&self, input: &CreateRating) -> StoreResult<Rating>;

    async fn has_rating(
        &self,
        kind: RatingKind,
        author: &str,
        crackme_hexid: &str,
    ) -> StoreResult<bool>;

    /// Mean and count of the live ratings; `0.0` average when there are none.
    async fn rating_summary(&self, kind: RatingKind, crackme_hexid: &str)
        -> StoreResult<RatingSummary>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification>;

    /// Newest first.
    async fn list_notifications(&self, recipient: &str) -> StoreResult<Vec<Notification>>;

    async fn count_unseen_notifications(&self, recipient: &str) -> StoreResult<i64>;

    /// Returns the number of notifications newly marked seen.
    async fn mark_notifications_seen(&self, recipient: &str) -> StoreResult<u64>;

    /// Deletes only if `recipient` owns the notification.
    async fn delete_notification(&self, recipient: &str, hexid: &str) -> StoreResult<bool>;
}

/// Every collection accessor behind one injectable handle.
pub trait EntityStore:
    HealthStore
    + UserStore
    + CrackmeStore
    + SolutionStore
    + CommentStore
    + RatingStore
    + NotificationStore
{
}

impl<T> EntityStore for T where
    T: HealthStore
        + UserStore
        + CrackmeStore
        + SolutionStore
        + CommentStore
        + RatingStore
        + NotificationStore
{
}
