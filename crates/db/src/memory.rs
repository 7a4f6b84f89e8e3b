//! In-process [`EntityStore`](crate::store::EntityStore) for tests and local
//! tooling.
//!
//! Mirrors the PostgreSQL schema constraints: unique user names and emails,
//! unique hex ids, one live solution per (author, crackme), one live rating
//! per (kind, author, crackme) and the cascading crackme delete. Calling
//! [`MemoryStore::set_unavailable`] makes every operation fail with
//! `CoreError::Unavailable`, the same signal `PgStore` gives when the pool
//! cannot reach the database.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use crackmes_core::error::CoreError;
use crackmes_core::hex_id;
use crackmes_core::rating::{self, RatingKind};
use crackmes_core::types::DbId;
use tokio::sync::{Mutex, MutexGuard};

use crate::models::comment::{Comment, CreateComment};
use crate::models::crackme::{CreateCrackme, Crackme};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::rating::{CreateRating, Rating, RatingSummary};
use crate::models::solution::{CreateSolution, Solution};
use crate::models::user::{CreateUser, User};
use crate::store::{
    CommentStore, CrackmeStore, HealthStore, NotificationStore, RatingStore, SolutionStore,
    StoreResult, UserStore,
};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: Vec<User>,
    crackmes: Vec<Crackme>,
    solutions: Vec<Solution>,
    comments: Vec<Comment>,
    ratings: Vec<Rating>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn live_crackme_mut(&mut self, hexid: &str) -> StoreResult<&mut Crackme> {
        self.crackmes
            .iter_mut()
            .find(|c| c.hexid == hexid && !c.deleted)
            .ok_or_else(|| CoreError::not_found("Crackme", hexid))
    }
}

/// Mutex-guarded in-memory tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the backing store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Unavailable("memory store is switched off".into()));
        }
        Ok(self.tables.lock().await)
    }
}

fn duplicate(constraint: &str) -> CoreError {
    CoreError::Conflict(format!("Duplicate value violates {constraint}"))
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.tables().await.map(|_| ())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.tables().await?;
        if t.users.iter().any(|u| u.name == input.name) {
            return Err(duplicate("users_name_key"));
        }
        if t.users.iter().any(|u| u.email == input.email) {
            return Err(duplicate("users_email_key"));
        }
        let user = User {
            id: t.next_id(),
            hexid: hex_id::generate(),
            name: input.name.clone(),
            email: input.email.clone(),
            password: input.password.clone(),
            visible: true,
            deleted: false,
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<User> {
        let t = self.tables().await?;
        t.users
            .iter()
            .find(|u| u.name == name && !u.deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("User", name))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let t = self.tables().await?;
        t.users
            .iter()
            .find(|u| u.email == email && !u.deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("User", email))
    }

    async fn list_visible_users(&self) -> StoreResult<Vec<User>> {
        let t = self.tables().await?;
        let mut users: Vec<User> = t
            .users
            .iter()
            .filter(|u| u.visible && !u.deleted)
            .cloned()
            .collect();
        users.sort_by(User::name_order);
        Ok(users)
    }

    async fn count_visible_users(&self) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.users.iter().filter(|u| u.visible && !u.deleted).count() as i64)
    }
}

#[async_trait]
impl CrackmeStore for MemoryStore {
    async fn create_crackme(&self, input: &CreateCrackme) -> StoreResult<Crackme> {
        let mut t = self.tables().await?;
        if t.crackmes.iter().any(|c| c.hexid == input.hexid) {
            return Err(duplicate("crackmes_hexid_key"));
        }
        let crackme = Crackme {
            id: t.next_id(),
            hexid: input.hexid.clone(),
            name: input.name.clone(),
            author: input.author.clone(),
            info: input.info.clone(),
            lang: input.lang.clone(),
            arch: input.arch.clone(),
            platform: input.platform.clone(),
            difficulty: 0.0,
            quality: 0.0,
            filename: input.filename.clone(),
            visible: false,
            deleted: false,
            nb_solutions: 0,
            nb_comments: 0,
            created_at: Utc::now(),
        };
        t.crackmes.push(crackme.clone());
        Ok(crackme)
    }

    async fn find_crackme_by_hexid(&self, hexid: &str) -> StoreResult<Crackme> {
        let t = self.tables().await?;
        t.crackmes
            .iter()
            .find(|c| c.hexid == hexid && !c.deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Crackme", hexid))
    }

    async fn list_visible_crackmes_by_author(&self, author: &str) -> StoreResult<Vec<Crackme>> {
        let t = self.tables().await?;
        Ok(t.crackmes
            .iter()
            .rev()
            .filter(|c| c.author == author && c.visible && !c.deleted)
            .cloned()
            .collect())
    }

    async fn list_crackme_hexids(&self) -> StoreResult<Vec<String>> {
        let t = self.tables().await?;
        Ok(t.crackmes
            .iter()
            .filter(|c| !c.deleted)
            .map(|c| c.hexid.clone())
            .collect())
    }

    async fn count_visible_crackmes_by_author(&self, author: &str) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.crackmes
            .iter()
            .filter(|c| c.author == author && c.visible && !c.deleted)
            .count() as i64)
    }

    async fn count_visible_crackmes(&self) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.crackmes.iter().filter(|c| c.visible && !c.deleted).count() as i64)
    }

    async fn approve_crackme(&self, hexid: &str) -> StoreResult<Option<Crackme>> {
        let mut t = self.tables().await?;
        Ok(t.crackmes
            .iter_mut()
            .find(|c| c.hexid == hexid && !c.visible && !c.deleted)
            .map(|c| {
                c.visible = true;
                c.clone()
            }))
    }

    async fn delete_crackme(&self, hexid: &str) -> StoreResult<bool> {
        let mut t = self.tables().await?;
        let Ok(crackme) = t.live_crackme_mut(hexid) else {
            return Ok(false);
        };
        crackme.deleted = true;
        let id = crackme.id;

        for s in t.solutions.iter_mut().filter(|s| s.crackme_id == id) {
            s.deleted = true;
        }
        for c in t.comments.iter_mut().filter(|c| c.crackme_hexid == hexid) {
            c.deleted = true;
        }
        for r in t.ratings.iter_mut().filter(|r| r.crackme_hexid == hexid) {
            r.deleted = true;
        }
        Ok(true)
    }

    async fn increment_crackme_solutions(&self, hexid: &str) -> StoreResult<()> {
        let mut t = self.tables().await?;
        t.live_crackme_mut(hexid)?.nb_solutions += 1;
        Ok(())
    }

    async fn increment_crackme_comments(&self, hexid: &str) -> StoreResult<()> {
        let mut t = self.tables().await?;
        t.live_crackme_mut(hexid)?.nb_comments += 1;
        Ok(())
    }

    async fn set_crackme_counts(
        &self,
        hexid: &str,
        nb_solutions: i64,
        nb_comments: i64,
    ) -> StoreResult<()> {
        let mut t = self.tables().await?;
        let crackme = t.live_crackme_mut(hexid)?;
        crackme.nb_solutions = nb_solutions;
        crackme.nb_comments = nb_comments;
        Ok(())
    }

    async fn set_crackme_rating(
        &self,
        hexid: &str,
        kind: RatingKind,
        average: f64,
    ) -> StoreResult<()> {
        let mut t = self.tables().await?;
        let crackme = t.live_crackme_mut(hexid)?;
        match kind {
            RatingKind::Difficulty => crackme.difficulty = average,
            RatingKind::Quality => crackme.quality = average,
        }
        Ok(())
    }
}

#[async_trait]
impl SolutionStore for MemoryStore {
    async fn create_solution(&self, input: &CreateSolution) -> StoreResult<Solution> {
        let mut t = self.tables().await?;
        if t.solutions.iter().any(|s| s.hexid == input.hexid) {
            return Err(duplicate("solutions_hexid_key"));
        }
        if t.solutions
            .iter()
            .any(|s| s.author == input.author && s.crackme_id == input.crackme_id && !s.deleted)
        {
            return Err(duplicate("uq_solutions_author_crackme_live"));
        }
        let solution = Solution {
            id: t.next_id(),
            hexid: input.hexid.clone(),
            crackme_id: input.crackme_id,
            crackme_hexid: input.crackme_hexid.clone(),
            crackme_name: input.crackme_name.clone(),
            author: input.author.clone(),
            info: input.info.clone(),
            filename: input.filename.clone(),
            visible: false,
            deleted: false,
            created_at: Utc::now(),
        };
        t.solutions.push(solution.clone());
        Ok(solution)
    }

    async fn find_solution_by_hexid(&self, hexid: &str) -> StoreResult<Solution> {
        let t = self.tables().await?;
        t.solutions
            .iter()
            .find(|s| s.hexid == hexid && !s.deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Solution", hexid))
    }

    async fn has_live_solution(&self, author: &str, crackme_id: DbId) -> StoreResult<bool> {
        let t = self.tables().await?;
        Ok(t.solutions
            .iter()
            .any(|s| s.author == author && s.crackme_id == crackme_id && !s.deleted))
    }

    async fn list_visible_solutions_for_crackme(
        &self,
        crackme_id: DbId,
    ) -> StoreResult<Vec<Solution>> {
        let t = self.tables().await?;
        Ok(t.solutions
            .iter()
            .filter(|s| s.crackme_id == crackme_id && s.visible && !s.deleted)
            .cloned()
            .collect())
    }

    async fn list_visible_solutions_by_author(&self, author: &str) -> StoreResult<Vec<Solution>> {
        let t = self.tables().await?;
        Ok(t.solutions
            .iter()
            .rev()
            .filter(|s| s.author == author && s.visible && !s.deleted)
            .cloned()
            .collect())
    }

    async fn count_visible_solutions_for_crackme(&self, crackme_id: DbId) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.solutions
            .iter()
            .filter(|s| s.crackme_id == crackme_id && s.visible && !s.deleted)
            .count() as i64)
    }

    async fn count_visible_solutions_by_author(&self, author: &str) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.solutions
            .iter()
            .filter(|s| s.author == author && s.visible && !s.deleted)
            .count() as i64)
    }

    async fn estimate_solution_total(&self) -> StoreResult<i64> {
        // Every row, like the planner estimate.
        let t = self.tables().await?;
        Ok(t.solutions.len() as i64)
    }

    async fn approve_solution(&self, hexid: &str) -> StoreResult<Option<Solution>> {
        let mut t = self.tables().await?;
        Ok(t.solutions
            .iter_mut()
            .find(|s| s.hexid == hexid && !s.visible && !s.deleted)
            .map(|s| {
                s.visible = true;
                s.clone()
            }))
    }

    async fn delete_solution(&self, hexid: &str) -> StoreResult<bool> {
        let mut t = self.tables().await?;
        Ok(t.solutions
            .iter_mut()
            .find(|s| s.hexid == hexid && !s.deleted)
            .map(|s| s.deleted = true)
            .is_some())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        let mut t = self.tables().await?;
        let comment = Comment {
            id: t.next_id(),
            hexid: hex_id::generate(),
            content: input.content.clone(),
            author: input.author.clone(),
            crackme_hexid: input.crackme_hexid.clone(),
            crackme_name: input.crackme_name.clone(),
            visible: true,
            deleted: false,
            created_at: Utc::now(),
        };
        t.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment_by_hexid(&self, hexid: &str) -> StoreResult<Comment> {
        let t = self.tables().await?;
        t.comments
            .iter()
            .find(|c| c.hexid == hexid && !c.deleted)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Comment", hexid))
    }

    async fn list_visible_comments_for_crackme(
        &self,
        crackme_hexid: &str,
    ) -> StoreResult<Vec<Comment>> {
        let t = self.tables().await?;
        Ok(t.comments
            .iter()
            .filter(|c| c.crackme_hexid == crackme_hexid && c.visible && !c.deleted)
            .cloned()
            .collect())
    }

    async fn count_visible_comments_for_crackme(&self, crackme_hexid: &str) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.comments
            .iter()
            .filter(|c| c.crackme_hexid == crackme_hexid && c.visible && !c.deleted)
            .count() as i64)
    }

    async fn count_visible_comments_by_author(&self, author: &str) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.comments
            .iter()
            .filter(|c| c.author == author && c.visible && !c.deleted)
            .count() as i64)
    }

    async fn delete_comment(&self, hexid: &str) -> StoreResult<bool> {
        let mut t = self.tables().await?;
        Ok(t.comments
            .iter_mut()
            .find(|c| c.hexid == hexid && !c.deleted)
            .map(|c| c.deleted = true)
            .is_some())
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn create_rating(&self, input: &CreateRating) -> StoreResult<Rating> {
        let mut t = self.tables().await?;
        let kind = input.kind.name();
        if t.ratings.iter().any(|r| {
            r.kind == kind
                && r.author == input.author
                && r.crackme_hexid == input.crackme_hexid
                && !r.deleted
        }) {
            return Err(duplicate("uq_ratings_kind_author_crackme_live"));
        }
        let rating = Rating {
            id: t.next_id(),
            hexid: hex_id::generate(),
            kind: kind.to_string(),
            author: input.author.clone(),
            crackme_hexid: input.crackme_hexid.clone(),
            rating: input.rating,
            deleted: false,
            created_at: Utc::now(),
        };
        t.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn has_rating(
        &self,
        kind: RatingKind,
        author: &str,
        crackme_hexid: &str,
    ) -> StoreResult<bool> {
        let t = self.tables().await?;
        Ok(t.ratings.iter().any(|r| {
            r.kind == kind.name()
                && r.author == author
                && r.crackme_hexid == crackme_hexid
                && !r.deleted
        }))
    }

    async fn rating_summary(
        &self,
        kind: RatingKind,
        crackme_hexid: &str,
    ) -> StoreResult<RatingSummary> {
        let t = self.tables().await?;
        let values: Vec<i32> = t
            .ratings
            .iter()
            .filter(|r| r.kind == kind.name() && r.crackme_hexid == crackme_hexid && !r.deleted)
            .map(|r| r.rating)
            .collect();
        Ok(RatingSummary {
            average: rating::average(&values),
            count: values.len() as i64,
        })
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        let mut t = self.tables().await?;
        let notification = Notification {
            id: t.next_id(),
            hexid: hex_id::generate(),
            recipient: input.recipient.clone(),
            message: input.message.clone(),
            seen: false,
            created_at: Utc::now(),
        };
        t.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(&self, recipient: &str) -> StoreResult<Vec<Notification>> {
        let t = self.tables().await?;
        Ok(t.notifications
            .iter()
            .rev()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect())
    }

    async fn count_unseen_notifications(&self, recipient: &str) -> StoreResult<i64> {
        let t = self.tables().await?;
        Ok(t.notifications
            .iter()
            .filter(|n| n.recipient == recipient && !n.seen)
            .count() as i64)
    }

    async fn mark_notifications_seen(&self, recipient: &str) -> StoreResult<u64> {
        let mut t = self.tables().await?;
        let mut updated = 0;
        for n in t
            .notifications
            .iter_mut()
            .filter(|n| n.recipient == recipient && !n.seen)
        {
            n.seen = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_notification(&self, recipient: &str, hexid: &str) -> StoreResult<bool> {
        let mut t = self.tables().await?;
        let before = t.notifications.len();
        t.notifications
            .retain(|n| !(n.recipient == recipient && n.hexid == hexid));
        Ok(t.notifications.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn new_user(name: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hash".to_string(),
        }
    }

    fn new_crackme(author: &str) -> CreateCrackme {
        CreateCrackme {
            hexid: hex_id::generate(),
            name: "keygenme".to_string(),
            author: author.to_string(),
            info: String::new(),
            lang: "C".to_string(),
            arch: "x86-64".to_string(),
            platform: "Linux".to_string(),
            filename: "keygenme.zip".to_string(),
        }
    }

    fn new_solution(crackme: &Crackme, author: &str) -> CreateSolution {
        CreateSolution {
            hexid: hex_id::generate(),
            crackme_id: crackme.id,
            crackme_hexid: crackme.hexid.clone(),
            crackme_name: crackme.name.clone(),
            author: author.to_string(),
            info: "patched the check".to_string(),
            filename: "solve.zip".to_string(),
        }
    }

    #[tokio::test]
    async fn user_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_user(&new_user("elvis")).await.unwrap();

        assert!(store.find_user_by_name("elvis").await.is_ok());
        assert_matches!(
            store.find_user_by_name("Elvis").await,
            Err(CoreError::NotFound { entity: "User", .. })
        );
        assert_matches!(
            store.find_user_by_name("ELVIS").await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn names_differing_in_case_are_distinct_users() {
        let store = MemoryStore::new();
        store.create_user(&new_user("Elvis")).await.unwrap();
        store.create_user(&new_user("elvis")).await.unwrap();

        assert_eq!(store.find_user_by_name("Elvis").await.unwrap().name, "Elvis");
        assert_eq!(store.find_user_by_name("elvis").await.unwrap().name, "elvis");
    }

    #[tokio::test]
    async fn duplicate_user_name_conflicts() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice")).await.unwrap();
        assert_matches!(
            store.create_user(&new_user("alice")).await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn users_listed_by_name() {
        let store = MemoryStore::new();
        for name in ["carol", "alice", "Bob"] {
            store.create_user(&new_user(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_visible_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["Bob", "alice", "carol"]);
        assert_eq!(store.count_visible_users().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn second_live_solution_conflicts() {
        let store = MemoryStore::new();
        let crackme = store.create_crackme(&new_crackme("alice")).await.unwrap();
        let first = store
            .create_solution(&new_solution(&crackme, "bob"))
            .await
            .unwrap();

        assert_matches!(
            store.create_solution(&new_solution(&crackme, "bob")).await,
            Err(CoreError::Conflict(_))
        );

        // Deleting the first frees the slot.
        assert!(store.delete_solution(&first.hexid).await.unwrap());
        assert!(store
            .create_solution(&new_solution(&crackme, "bob"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn approve_only_transitions_once() {
        let store = MemoryStore::new();
        let crackme = store.create_crackme(&new_crackme("alice")).await.unwrap();
        assert!(store.approve_crackme(&crackme.hexid).await.unwrap().is_some());
        assert!(store.approve_crackme(&crackme.hexid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleted_records_are_hidden() {
        let store = MemoryStore::new();
        let crackme = store.create_crackme(&new_crackme("alice")).await.unwrap();
        store.approve_crackme(&crackme.hexid).await.unwrap();
        assert!(store.delete_crackme(&crackme.hexid).await.unwrap());

        assert_matches!(
            store.find_crackme_by_hexid(&crackme.hexid).await,
            Err(CoreError::NotFound { .. })
        );
        assert_eq!(store.count_visible_crackmes().await.unwrap(), 0);
        assert!(store.list_crackme_hexids().await.unwrap().is_empty());
        assert!(!store.delete_crackme(&crackme.hexid).await.unwrap());
        assert_matches!(
            store.increment_crackme_comments(&crackme.hexid).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn crackme_delete_cascades_to_children() {
        let store = MemoryStore::new();
        let crackme = store.create_crackme(&new_crackme("alice")).await.unwrap();
        store.approve_crackme(&crackme.hexid).await.unwrap();
        let other = store.create_crackme(&new_crackme("alice")).await.unwrap();
        store.approve_crackme(&other.hexid).await.unwrap();

        let solution = store
            .create_solution(&new_solution(&crackme, "bob"))
            .await
            .unwrap();
        store.approve_solution(&solution.hexid).await.unwrap();
        let kept = store
            .create_solution(&new_solution(&other, "bob"))
            .await
            .unwrap();
        store.approve_solution(&kept.hexid).await.unwrap();
        let comment = store
            .create_comment(&CreateComment {
                content: "nice one".into(),
                author: "bob".into(),
                crackme_hexid: crackme.hexid.clone(),
                crackme_name: crackme.name.clone(),
            })
            .await
            .unwrap();
        store
            .create_rating(&CreateRating {
                kind: RatingKind::Quality,
                author: "bob".into(),
                crackme_hexid: crackme.hexid.clone(),
                rating: 4,
            })
            .await
            .unwrap();

        assert!(store.delete_crackme(&crackme.hexid).await.unwrap());

        assert_matches!(
            store.find_solution_by_hexid(&solution.hexid).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(
            store.find_comment_by_hexid(&comment.hexid).await,
            Err(CoreError::NotFound { .. })
        );
        assert_eq!(store.count_visible_solutions_by_author("bob").await.unwrap(), 1);
        assert_eq!(store.count_visible_comments_by_author("bob").await.unwrap(), 0);
        assert!(!store
            .has_rating(RatingKind::Quality, "bob", &crackme.hexid)
            .await
            .unwrap());
        assert!(store.find_solution_by_hexid(&kept.hexid).await.is_ok());
    }

    #[tokio::test]
    async fn second_rating_of_same_kind_conflicts() {
        let store = MemoryStore::new();
        let crackme = store.create_crackme(&new_crackme("alice")).await.unwrap();
        let rate = |kind, rating| CreateRating {
            kind,
            author: "bob".into(),
            crackme_hexid: crackme.hexid.clone(),
            rating,
        };

        store.create_rating(&rate(RatingKind::Difficulty, 2)).await.unwrap();
        store.create_rating(&rate(RatingKind::Quality, 5)).await.unwrap();
        assert_matches!(
            store.create_rating(&rate(RatingKind::Difficulty, 4)).await,
            Err(CoreError::Conflict(_))
        );

        let summary = store
            .rating_summary(RatingKind::Difficulty, &crackme.hexid)
            .await
            .unwrap();
        assert_eq!(summary, RatingSummary { average: 2.0, count: 1 });
        let none = store
            .rating_summary(RatingKind::Quality, "507f1f77bcf86cd799439011")
            .await
            .unwrap();
        assert_eq!(none, RatingSummary { average: 0.0, count: 0 });
    }

    #[tokio::test]
    async fn notifications_scoped_to_recipient() {
        let store = MemoryStore::new();
        let n = store
            .create_notification(&CreateNotification {
                recipient: "alice".into(),
                message: "hello".into(),
            })
            .await
            .unwrap();

        assert!(!store.delete_notification("mallory", &n.hexid).await.unwrap());
        assert_eq!(store.count_unseen_notifications("alice").await.unwrap(), 1);
        assert_eq!(store.mark_notifications_seen("alice").await.unwrap(), 1);
        assert_eq!(store.count_unseen_notifications("alice").await.unwrap(), 0);
        assert!(store.delete_notification("alice", &n.hexid).await.unwrap());
        assert!(store.list_notifications("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_fails_every_operation() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice")).await.unwrap();
        store.set_unavailable(true);

        assert_matches!(store.ping().await, Err(CoreError::Unavailable(_)));
        assert_matches!(
            store.find_user_by_name("alice").await,
            Err(CoreError::Unavailable(_))
        );
        assert_matches!(store.list_visible_users().await, Err(CoreError::Unavailable(_)));
        assert_matches!(store.count_visible_users().await, Err(CoreError::Unavailable(_)));
        assert_matches!(
            store.count_visible_crackmes().await,
            Err(CoreError::Unavailable(_))
        );

        store.set_unavailable(false);
        assert!(store.find_user_by_name("alice").await.is_ok());
    }
}
