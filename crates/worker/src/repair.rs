//! Counter and rating repair.
//!
//! The request path only ever increments counters, so deletions (and any
//! increment or average refresh that failed after its record was written)
//! leave drift behind. This pass recomputes the true counts and rating
//! averages and writes them with the absolute set operations, or only
//! reports them in [`RepairMode::DryRun`].

use std::time::Duration;

use crackmes_content::{ContentService, ReconcileReport, RepairMode};
use crackmes_core::error::CoreError;
use tokio_util::sync::CancellationToken;

/// Reconcile every live crackme once.
pub async fn run_once(
    content: &ContentService,
    mode: RepairMode,
) -> Result<ReconcileReport, CoreError> {
    let report = content.reconcile_all(mode).await?;
    if report.failed > 0 {
        tracing::warn!(failed = report.failed, "Counter repair finished with failures");
    }
    Ok(report)
}

/// Run the repair pass every `every` until `cancel` is triggered.
///
/// A failed pass is logged and retried on the next tick.
pub async fn run(
    content: ContentService,
    every: Duration,
    mode: RepairMode,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = every.as_secs(),
        dry_run = mode == RepairMode::DryRun,
        "Counter repair loop started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Counter repair loop stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = run_once(&content, mode).await {
                    tracing::error!(error = %e, "Counter repair pass failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crackmes_core::rating::RatingKind;
    use crackmes_core::storage::StorageConfig;
    use crackmes_db::models::crackme::CreateCrackme;
    use crackmes_db::store::CrackmeStore;
    use crackmes_db::MemoryStore;

    use super::*;

    const HEXID: &str = "507f1f77bcf86cd799439011";

    async fn service_with_drift() -> (ContentService, Arc<MemoryStore>, tempfile::TempDir) {
        let store = Arc::new(MemoryStore::new());
        store
            .create_crackme(&CreateCrackme {
                hexid: HEXID.into(),
                name: "keygenme".into(),
                author: "alice".into(),
                info: String::new(),
                lang: "C".into(),
                arch: "x86".into(),
                platform: "Windows".into(),
                filename: "keygenme.zip".into(),
            })
            .await
            .unwrap();
        store.approve_crackme(HEXID).await.unwrap();
        store.set_crackme_counts(HEXID, 3, 7).await.unwrap();
        store
            .set_crackme_rating(HEXID, RatingKind::Quality, 4.5)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            crackme_root: dir.path().join("crackme"),
            solution_root: dir.path().join("solution"),
        }
        .resolve()
        .unwrap();
        let content = ContentService::new(store.clone(), Arc::new(storage));
        (content, store, dir)
    }

    #[tokio::test]
    async fn run_once_overwrites_drift() {
        let (content, store, _dir) = service_with_drift().await;

        let report = run_once(&content, RepairMode::Apply).await.unwrap();
        assert_eq!(report.updated, 1);

        let crackme = store.find_crackme_by_hexid(HEXID).await.unwrap();
        assert_eq!((crackme.nb_solutions, crackme.nb_comments), (0, 0));
        assert_eq!(crackme.quality, 0.0);
    }

    #[tokio::test]
    async fn dry_run_leaves_drift_in_place() {
        let (content, store, _dir) = service_with_drift().await;

        let report = run_once(&content, RepairMode::DryRun).await.unwrap();
        assert_eq!(report.drifted, 1);
        assert_eq!(report.updated, 0);

        let crackme = store.find_crackme_by_hexid(HEXID).await.unwrap();
        assert_eq!((crackme.nb_solutions, crackme.nb_comments), (3, 7));
        assert_eq!(crackme.quality, 4.5);
    }

    #[tokio::test]
    async fn run_once_fails_on_unavailable_store() {
        let (content, store, _dir) = service_with_drift().await;
        store.set_unavailable(true);
        assert!(matches!(
            run_once(&content, RepairMode::Apply).await,
            Err(CoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn loop_repairs_then_stops_on_cancel() {
        let (content, store, _dir) = service_with_drift().await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            content,
            Duration::from_millis(10),
            RepairMode::Apply,
            cancel.clone(),
        ));

        // The first tick fires immediately.
        for _ in 0..100 {
            let crackme = store.find_crackme_by_hexid(HEXID).await.unwrap();
            if crackme.nb_comments == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let crackme = store.find_crackme_by_hexid(HEXID).await.unwrap();
        assert_eq!(crackme.nb_comments, 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
