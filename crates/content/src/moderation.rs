//! Moderation transitions: approve, reject and delete.
//!
//! Every transition is checked against the visibility state machine first
//! and then applied with a conditional store update, so a record that
//! changed state in between is reported as a conflict instead of being
//! transitioned twice.

use crackmes_core::error::CoreError;
use crackmes_core::visibility::{self, transition_counter_effect, ContentKind, Transition, Visibility};
use crackmes_db::models::comment::Comment;
use crackmes_db::models::crackme::Crackme;
use crackmes_db::models::solution::Solution;
use crackmes_db::store::{CommentStore, CrackmeStore, SolutionStore};
use crackmes_events::ContentEvent;
use serde::Serialize;

use crate::artifact::remove_artifact;
use crate::ContentService;

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Moderated {
    pub kind: ContentKind,
    pub hexid: String,
    pub state: Visibility,
}

/// A live record of any moderated kind.
enum Record {
    Crackme(Crackme),
    Solution(Solution),
    Comment(Comment),
}

impl Record {
    fn visibility(&self) -> Visibility {
        match self {
            Self::Crackme(c) => c.visibility(),
            Self::Solution(s) => s.visibility(),
            Self::Comment(c) => c.visibility(),
        }
    }
}

fn changed_concurrently(kind: ContentKind, hexid: &str) -> CoreError {
    CoreError::Conflict(format!(
        "{} {hexid} changed state concurrently",
        kind.entity()
    ))
}

impl ContentService {
    /// `Pending -> Visible`. Approving a solution bumps its crackme's
    /// `nb_solutions` exactly once, and only while that crackme is itself
    /// visible.
    pub async fn approve(&self, kind: ContentKind, hexid: &str) -> Result<Moderated, CoreError> {
        let record = self.load(kind, hexid).await?;
        let state = visibility::apply(kind, record.visibility(), Transition::Approve)?;

        let event = match record {
            Record::Crackme(_) => {
                let crackme = self
                    .store
                    .approve_crackme(hexid)
                    .await?
                    .ok_or_else(|| changed_concurrently(kind, hexid))?;
                ContentEvent::CrackmeApproved {
                    crackme_name: crackme.name,
                    author: crackme.author,
                }
            }
            Record::Solution(pending) => {
                self.visible_crackme(&pending.crackme_hexid).await?;
                let solution = self
                    .store
                    .approve_solution(hexid)
                    .await?
                    .ok_or_else(|| changed_concurrently(kind, hexid))?;
                if let Some(effect) = transition_counter_effect(kind, Transition::Approve) {
                    self.apply_counter_effect(effect, &solution.crackme_hexid)
                        .await;
                }
                ContentEvent::SolutionApproved {
                    crackme_name: solution.crackme_name,
                    submitter: solution.author,
                }
            }
            Record::Comment(_) => {
                return Err(CoreError::Validation("Comments are not moderated".into()));
            }
        };

        tracing::info!(kind = kind.name(), hexid = %hexid, "Content approved");
        self.notifier.dispatch(&event).await;
        Ok(Moderated {
            kind,
            hexid: hexid.to_string(),
            state,
        })
    }

    /// `Pending -> Deleted` for crackmes and solutions: removes the stored
    /// artifact and tells the author why.
    pub async fn reject(
        &self,
        kind: ContentKind,
        hexid: &str,
        reason: Option<&str>,
    ) -> Result<Moderated, CoreError> {
        let record = self.load(kind, hexid).await?;
        let state = visibility::apply(kind, record.visibility(), Transition::Reject)?;
        let reason = reason.map(str::to_string);

        let event = match record {
            Record::Crackme(crackme) => {
                if !self.store.delete_crackme(hexid).await? {
                    return Err(changed_concurrently(kind, hexid));
                }
                self.discard_artifact(kind, &crackme.author, &crackme.hexid, &crackme.filename)
                    .await;
                ContentEvent::CrackmeRejected {
                    crackme_name: crackme.name,
                    author: crackme.author,
                    reason,
                }
            }
            Record::Solution(solution) => {
                if !self.store.delete_solution(hexid).await? {
                    return Err(changed_concurrently(kind, hexid));
                }
                self.discard_artifact(
                    kind,
                    &solution.author,
                    &solution.hexid,
                    &solution.filename,
                )
                .await;
                ContentEvent::SolutionRejected {
                    crackme_name: solution.crackme_name,
                    submitter: solution.author,
                    reason,
                }
            }
            Record::Comment(_) => {
                return Err(CoreError::Validation("Comments are not moderated".into()));
            }
        };

        tracing::info!(kind = kind.name(), hexid = %hexid, "Content rejected");
        self.notifier.dispatch(&event).await;
        Ok(Moderated {
            kind,
            hexid: hexid.to_string(),
            state,
        })
    }

    /// `Pending | Visible -> Deleted`. Terminal. Counters are left as they
    /// are until the next reconciliation. Deleting a crackme deletes its
    /// solutions, comments and ratings with it; stored files are kept.
    pub async fn delete(&self, kind: ContentKind, hexid: &str) -> Result<Moderated, CoreError> {
        let record = self.load(kind, hexid).await?;
        let state = visibility::apply(kind, record.visibility(), Transition::Delete)?;

        let deleted = match record {
            Record::Crackme(_) => self.store.delete_crackme(hexid).await?,
            Record::Solution(_) => self.store.delete_solution(hexid).await?,
            Record::Comment(_) => self.store.delete_comment(hexid).await?,
        };
        if !deleted {
            return Err(changed_concurrently(kind, hexid));
        }

        tracing::info!(kind = kind.name(), hexid = %hexid, "Content deleted");
        Ok(Moderated {
            kind,
            hexid: hexid.to_string(),
            state,
        })
    }

    async fn load(&self, kind: ContentKind, hexid: &str) -> Result<Record, CoreError> {
        Ok(match kind {
            ContentKind::Crackme => Record::Crackme(self.store.find_crackme_by_hexid(hexid).await?),
            ContentKind::Solution => {
                Record::Solution(self.store.find_solution_by_hexid(hexid).await?)
            }
            ContentKind::Comment => Record::Comment(self.store.find_comment_by_hexid(hexid).await?),
        })
    }

    /// Remove a rejected artifact. Failures are logged; the record is
    /// already deleted.
    async fn discard_artifact(&self, kind: ContentKind, author: &str, hexid: &str, filename: &str) {
        let path = match self.artifact_path(kind, author, hexid, filename) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = kind.name(),
                    hexid = %hexid,
                    "Rejected artifact has no safe path, left in place"
                );
                return;
            }
        };
        if let Err(e) = remove_artifact(&path).await {
            tracing::warn!(
                error = %e,
                kind = kind.name(),
                hexid = %hexid,
                path = %path.display(),
                "Failed to remove rejected artifact"
            );
        }
    }
}
