//! Public read paths. Only visible, non-deleted records are returned.

use crackmes_core::error::CoreError;
use crackmes_db::models::comment::Comment;
use crackmes_db::models::crackme::Crackme;
use crackmes_db::models::solution::Solution;
use crackmes_db::models::user::User;
use crackmes_db::store::{CommentStore, CrackmeStore, SolutionStore, UserStore};
use serde::Serialize;

use crate::ContentService;

/// A crackme page: the crackme with its visible solutions and comments.
#[derive(Debug, Clone, Serialize)]
pub struct CrackmeDetail {
    pub crackme: Crackme,
    pub solutions: Vec<Solution>,
    pub comments: Vec<Comment>,
}

/// A user page with per-user counts.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub crackmes: Vec<Crackme>,
    pub solutions: Vec<Solution>,
    pub nb_crackmes: i64,
    pub nb_solutions: i64,
    pub nb_comments: i64,
}

/// Site-wide totals for display.
#[derive(Debug, Clone, Serialize)]
pub struct SiteStats {
    pub users: i64,
    pub crackmes: i64,
    /// Approximate; see [`SolutionStore::estimate_solution_total`].
    pub solutions_estimate: i64,
}

impl ContentService {
    pub async fn crackme_detail(&self, hexid: &str) -> Result<CrackmeDetail, CoreError> {
        let crackme = self.visible_crackme(hexid).await?;
        let solutions = self
            .store
            .list_visible_solutions_for_crackme(crackme.id)
            .await?;
        let comments = self
            .store
            .list_visible_comments_for_crackme(&crackme.hexid)
            .await?;
        Ok(CrackmeDetail {
            crackme,
            solutions,
            comments,
        })
    }

    /// Profile of a visible user. The name match is exact.
    pub async fn user_profile(&self, name: &str) -> Result<UserProfile, CoreError> {
        let user = self.store.find_user_by_name(name).await?;
        if !user.visible {
            return Err(CoreError::not_found("User", name));
        }
        let crackmes = self.store.list_visible_crackmes_by_author(&user.name).await?;
        let solutions = self
            .store
            .list_visible_solutions_by_author(&user.name)
            .await?;
        let nb_crackmes = self
            .store
            .count_visible_crackmes_by_author(&user.name)
            .await?;
        let nb_solutions = self
            .store
            .count_visible_solutions_by_author(&user.name)
            .await?;
        let nb_comments = self
            .store
            .count_visible_comments_by_author(&user.name)
            .await?;
        Ok(UserProfile {
            user,
            crackmes,
            solutions,
            nb_crackmes,
            nb_solutions,
            nb_comments,
        })
    }

    /// Visible users ordered by name.
    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.store.list_visible_users().await
    }

    pub async fn stats(&self) -> Result<SiteStats, CoreError> {
        let users = self.store.count_visible_users().await?;
        let crackmes = self.store.count_visible_crackmes().await?;
        // Planner estimate: display only, never used for counters.
        let solutions_estimate = self.store.estimate_solution_total().await?;
        Ok(SiteStats {
            users,
            crackmes,
            solutions_estimate,
        })
    }
}
