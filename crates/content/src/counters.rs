//! Counter Maintenance for `nb_solutions` / `nb_comments` and the cached
//! `difficulty` / `quality` averages.
//!
//! On the request path counters only ever move by a single atomic
//! increment, once per lifecycle event (comment created, solution
//! approved). Deletions do not decrement; [`ContentService::reconcile_all`]
//! recomputes the true values out of band and overwrites them.

use crackmes_core::error::CoreError;
use crackmes_core::rating::{average_drifted, RatingKind};
use crackmes_core::visibility::CounterEffect;
use crackmes_db::store::{CommentStore, CrackmeStore, RatingStore, SolutionStore};
use serde::Serialize;

use crate::ContentService;

/// Whether a repair pass writes what it finds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairMode {
    #[default]
    Apply,
    /// Report drift without writing anything.
    DryRun,
}

/// Outcome of reconciling a single crackme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciled {
    pub hexid: String,
    /// `(nb_solutions, nb_comments)` before the run.
    pub before: (i64, i64),
    /// True counts.
    pub after: (i64, i64),
    /// Cached `(difficulty, quality)` before the run.
    pub ratings_before: (f64, f64),
    /// Recomputed `(difficulty, quality)`.
    pub ratings_after: (f64, f64),
    /// Whether the true values were written back.
    pub written: bool,
}

impl Reconciled {
    pub fn counts_changed(&self) -> bool {
        self.before != self.after
    }

    pub fn rating_changed(&self, kind: RatingKind) -> bool {
        let (before, after) = match kind {
            RatingKind::Difficulty => (self.ratings_before.0, self.ratings_after.0),
            RatingKind::Quality => (self.ratings_before.1, self.ratings_after.1),
        };
        average_drifted(before, after)
    }

    pub fn changed(&self) -> bool {
        self.counts_changed() || RatingKind::ALL.iter().any(|&k| self.rating_changed(k))
    }
}

/// Summary of a full reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub processed: usize,
    /// Crackmes whose cached values disagreed with the recount.
    pub drifted: usize,
    /// Crackmes whose cached values were overwritten.
    pub updated: usize,
    pub failed: usize,
}

impl ContentService {
    /// Atomically add one to a crackme's `nb_comments`.
    pub async fn increment_comments(&self, crackme_hexid: &str) -> Result<(), CoreError> {
        self.store.increment_crackme_comments(crackme_hexid).await
    }

    /// Atomically add one to a crackme's `nb_solutions`.
    pub async fn increment_solutions(&self, crackme_hexid: &str) -> Result<(), CoreError> {
        self.store.increment_crackme_solutions(crackme_hexid).await
    }

    /// Overwrite both counters. Reserved for the repair task.
    pub async fn set_counts(
        &self,
        crackme_hexid: &str,
        nb_solutions: i64,
        nb_comments: i64,
    ) -> Result<(), CoreError> {
        if nb_solutions < 0 || nb_comments < 0 {
            return Err(CoreError::Validation(
                "Counter values cannot be negative".into(),
            ));
        }
        self.store
            .set_crackme_counts(crackme_hexid, nb_solutions, nb_comments)
            .await
    }

    /// Apply the increment for a lifecycle event that already happened.
    ///
    /// The triggering record is persisted at this point, so a failure is
    /// logged and left for the repair task instead of failing the request.
    pub(crate) async fn apply_counter_effect(&self, effect: CounterEffect, crackme_hexid: &str) {
        let result = match effect {
            CounterEffect::Solutions => self.increment_solutions(crackme_hexid).await,
            CounterEffect::Comments => self.increment_comments(crackme_hexid).await,
        };
        if let Err(e) = result {
            tracing::error!(
                error = %e,
                crackme = %crackme_hexid,
                counter = ?effect,
                "Counter increment failed, left for reconciliation"
            );
        }
    }

    /// Recompute the true counts and rating averages of one crackme and
    /// overwrite the cached ones if they drifted.
    pub async fn reconcile(&self, crackme_hexid: &str) -> Result<Reconciled, CoreError> {
        self.reconcile_with(crackme_hexid, RepairMode::Apply).await
    }

    /// [`reconcile`](Self::reconcile) with an explicit mode. In
    /// [`RepairMode::DryRun`] nothing is written.
    pub async fn reconcile_with(
        &self,
        crackme_hexid: &str,
        mode: RepairMode,
    ) -> Result<Reconciled, CoreError> {
        let crackme = self.store.find_crackme_by_hexid(crackme_hexid).await?;
        let nb_solutions = self
            .store
            .count_visible_solutions_for_crackme(crackme.id)
            .await?;
        let nb_comments = self
            .store
            .count_visible_comments_for_crackme(&crackme.hexid)
            .await?;
        let difficulty = self
            .store
            .rating_summary(RatingKind::Difficulty, &crackme.hexid)
            .await?
            .average;
        let quality = self
            .store
            .rating_summary(RatingKind::Quality, &crackme.hexid)
            .await?
            .average;

        let mut outcome = Reconciled {
            ratings_before: (
                crackme.rating(RatingKind::Difficulty),
                crackme.rating(RatingKind::Quality),
            ),
            ratings_after: (difficulty, quality),
            hexid: crackme.hexid,
            before: (crackme.nb_solutions, crackme.nb_comments),
            after: (nb_solutions, nb_comments),
            written: false,
        };
        if !outcome.changed() {
            return Ok(outcome);
        }
        if mode == RepairMode::DryRun {
            tracing::info!(
                crackme = %outcome.hexid,
                counts = ?(outcome.before, outcome.after),
                ratings = ?(outcome.ratings_before, outcome.ratings_after),
                "Crackme drifted (dry run, not written)"
            );
            return Ok(outcome);
        }

        if outcome.counts_changed() {
            self.set_counts(&outcome.hexid, nb_solutions, nb_comments)
                .await?;
        }
        for (kind, average) in [
            (RatingKind::Difficulty, difficulty),
            (RatingKind::Quality, quality),
        ] {
            if outcome.rating_changed(kind) {
                self.store
                    .set_crackme_rating(&outcome.hexid, kind, average)
                    .await?;
            }
        }
        outcome.written = true;
        tracing::info!(
            crackme = %outcome.hexid,
            counts = ?(outcome.before, outcome.after),
            ratings = ?(outcome.ratings_before, outcome.ratings_after),
            "Repaired crackme counters"
        );
        Ok(outcome)
    }

    /// Reconcile every live crackme.
    ///
    /// A crackme deleted mid-run is skipped. An unreachable store aborts
    /// the run; any other per-crackme error is counted and the run goes on.
    pub async fn reconcile_all(&self, mode: RepairMode) -> Result<ReconcileReport, CoreError> {
        let hexids = self.store.list_crackme_hexids().await?;
        let mut report = ReconcileReport::default();

        for hexid in hexids {
            match self.reconcile_with(&hexid, mode).await {
                Ok(outcome) => {
                    report.processed += 1;
                    if outcome.changed() {
                        report.drifted += 1;
                    }
                    if outcome.written {
                        report.updated += 1;
                    }
                }
                Err(CoreError::NotFound { .. }) => {}
                Err(e @ CoreError::Unavailable(_)) => return Err(e),
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(error = %e, crackme = %hexid, "Counter reconciliation failed");
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            drifted = report.drifted,
            updated = report.updated,
            failed = report.failed,
            dry_run = mode == RepairMode::DryRun,
            "Counter reconciliation finished"
        );
        Ok(report)
    }
}
