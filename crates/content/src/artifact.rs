//! Writing and removing stored artifact files.

use std::io::ErrorKind;
use std::path::Path;

use tokio::io::AsyncWriteExt;

/// Write a new artifact. Fails if a file already exists at `path`.
pub async fn write_artifact(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Remove an artifact. A file that is already gone counts as removed.
pub async fn remove_artifact(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
