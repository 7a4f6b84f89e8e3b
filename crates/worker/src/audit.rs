//! Artifact storage audit.
//!
//! Every stored file is named `{author}+++{hexid}+++{filename}`. The audit
//! parses each name back and checks it against the live record with that
//! hex id. Nothing is deleted; findings are logged for an operator.

use std::path::Path;

use crackmes_content::ContentService;
use crackmes_core::error::CoreError;
use crackmes_core::storage::parse_artifact_file_name;
use crackmes_core::visibility::ContentKind;
use crackmes_db::store::{CrackmeStore, SolutionStore};

/// Findings for one storage root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub scanned: usize,
    /// Names that do not parse as `{author}+++{hexid}+++{filename}`.
    pub unparseable: usize,
    /// Files whose record is deleted or was never written.
    pub unreferenced: usize,
    /// Files whose record names a different author or file.
    pub mismatched: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.unparseable == 0 && self.unreferenced == 0 && self.mismatched == 0
    }
}

/// Audit the storage roots for crackmes and solutions.
pub async fn run(content: &ContentService) -> Result<(AuditReport, AuditReport), CoreError> {
    let crackmes = audit_root(content, ContentKind::Crackme).await?;
    let solutions = audit_root(content, ContentKind::Solution).await?;
    Ok((crackmes, solutions))
}

async fn audit_root(content: &ContentService, kind: ContentKind) -> Result<AuditReport, CoreError> {
    let root = content.storage().root_for(kind)?;
    let mut entries = tokio::fs::read_dir(root).await.map_err(|e| io_error(root, e))?;
    let mut report = AuditReport::default();

    while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(root, e))? {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        report.scanned += 1;

        let Some(name) = parse_artifact_file_name(&file_name) else {
            report.unparseable += 1;
            tracing::warn!(kind = kind.name(), file = %file_name, "Unrecognized file in artifact storage");
            continue;
        };

        let owner = match kind {
            ContentKind::Crackme => content
                .store()
                .find_crackme_by_hexid(name.hexid)
                .await
                .map(|c| (c.author, c.filename)),
            _ => content
                .store()
                .find_solution_by_hexid(name.hexid)
                .await
                .map(|s| (s.author, s.filename)),
        };

        match owner {
            Ok((author, filename)) if author == name.author && filename == name.filename => {}
            Ok(_) => {
                report.mismatched += 1;
                tracing::warn!(kind = kind.name(), file = %file_name, "Artifact does not match its record");
            }
            Err(CoreError::NotFound { .. }) => {
                report.unreferenced += 1;
                tracing::warn!(kind = kind.name(), file = %file_name, "Artifact has no live record");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        kind = kind.name(),
        scanned = report.scanned,
        unparseable = report.unparseable,
        unreferenced = report.unreferenced,
        mismatched = report.mismatched,
        "Artifact audit finished"
    );
    Ok(report)
}

fn io_error(root: &Path, e: std::io::Error) -> CoreError {
    CoreError::Internal(format!("Failed to scan {}: {e}", root.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crackmes_core::storage::{artifact_file_name, StorageConfig};
    use crackmes_db::models::crackme::CreateCrackme;
    use crackmes_db::MemoryStore;

    use super::*;

    const LIVE: &str = "507f1f77bcf86cd799439011";
    const GONE: &str = "507f1f77bcf86cd799439012";

    #[tokio::test]
    async fn classifies_files() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_crackme(&CreateCrackme {
                hexid: LIVE.into(),
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

        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            crackme_root: dir.path().join("crackme"),
            solution_root: dir.path().join("solution"),
        }
        .resolve()
        .unwrap();
        let root = storage.crackme_root.clone();
        for name in [
            artifact_file_name("alice", LIVE, "keygenme.zip"),
            artifact_file_name("mallory", LIVE, "keygenme.zip"),
            artifact_file_name("alice", GONE, "old.zip"),
            "notes.txt".to_string(),
        ] {
            std::fs::write(root.join(name), b"x").unwrap();
        }

        let content = ContentService::new(store, Arc::new(storage));
        let (crackmes, solutions) = run(&content).await.unwrap();

        assert_eq!(
            crackmes,
            AuditReport {
                scanned: 4,
                unparseable: 1,
                unreferenced: 1,
                mismatched: 1,
            }
        );
        assert!(!crackmes.is_clean());
        assert!(solutions.is_clean());
        assert_eq!(solutions.scanned, 0);
    }
}
