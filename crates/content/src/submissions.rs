//! Content creation: comments, solutions and crackmes.
//!
//! Comments are created `Visible` and bump `nb_comments` immediately.
//! Solutions and crackmes are created `Pending` with their artifact on
//! disk; their counters move only on approval.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crackmes_core::error::CoreError;
use crackmes_core::hex_id;
use crackmes_core::storage::{resolve_artifact_path, sanitize_filename};
use crackmes_core::validation::{
    validate_comment_content, validate_crackme_info, validate_crackme_name, validate_label,
    validate_solution_info,
};
use crackmes_core::visibility::{creation_counter_effect, ContentKind, Visibility};
use crackmes_db::models::comment::{Comment, CreateComment};
use crackmes_db::models::crackme::{CreateCrackme, Crackme};
use crackmes_db::models::solution::{CreateSolution, Solution};
use crackmes_db::store::{CommentStore, CrackmeStore, SolutionStore};
use crackmes_events::ContentEvent;
use futures::Stream;

use crate::artifact::write_artifact;
use crate::upload::{read_bounded, Upload};
use crate::ContentService;

const DUPLICATE_SOLUTION: &str = "You already submitted a solution to this crackme";

/// Descriptive fields of a crackme upload.
#[derive(Debug, Clone, Default)]
pub struct NewCrackme {
    pub name: String,
    /// Optional description.
    pub info: String,
    /// Language the crackme is written in.
    pub lang: String,
    pub arch: String,
    pub platform: String,
}

impl ContentService {
    /// Post a comment on a visible crackme.
    pub async fn create_comment(
        &self,
        author: &str,
        crackme_hexid: &str,
        content: &str,
    ) -> Result<Comment, CoreError> {
        let user = self.acting_user(author).await?;
        let content = validate_comment_content(content)?;
        let crackme = self.visible_crackme(crackme_hexid).await?;

        let comment = self
            .store
            .create_comment(&CreateComment {
                content: content.to_string(),
                author: user.name.clone(),
                crackme_hexid: crackme.hexid.clone(),
                crackme_name: crackme.name.clone(),
            })
            .await?;
        tracing::info!(
            hexid = %comment.hexid,
            crackme = %crackme.hexid,
            author = %user.name,
            "Comment created"
        );

        if let Some(effect) = creation_counter_effect(ContentKind::Comment) {
            self.apply_counter_effect(effect, &crackme.hexid).await;
        }
        self.notifier
            .dispatch(&ContentEvent::CommentCreated {
                crackme_name: crackme.name,
                crackme_author: crackme.author,
                commenter: user.name,
            })
            .await;
        Ok(comment)
    }

    /// Upload a solution for a visible crackme, with a write-up of at least
    /// ten characters. The solution starts `Pending`.
    ///
    /// The declared size is checked before anything else and the storage
    /// path is proven safe before the body is read or any record written.
    pub async fn submit_solution<S, B, E>(
        &self,
        author: &str,
        crackme_hexid: &str,
        info: &str,
        upload: Upload<S>,
    ) -> Result<Solution, CoreError>
    where
        S: Stream<Item = Result<B, E>> + Unpin + Send,
        B: AsRef<[u8]>,
        E: Display,
    {
        let declared = upload.check_size()?;
        let user = self.acting_user(author).await?;
        let info = validate_solution_info(info)?;
        let crackme = self.visible_crackme(crackme_hexid).await?;

        // Application-level duplicate check. The partial unique index
        // catches the concurrent case below.
        if self.store.has_live_solution(&user.name, crackme.id).await? {
            return Err(CoreError::Conflict(DUPLICATE_SOLUTION.into()));
        }

        let filename = sanitize_filename(&upload.filename)?;
        let hexid = hex_id::generate();
        let path = self.artifact_path(ContentKind::Solution, &user.name, &hexid, &filename)?;
        let bytes = read_bounded(upload.body, declared).await?;

        let solution = self
            .store
            .create_solution(&CreateSolution {
                hexid,
                crackme_id: crackme.id,
                crackme_hexid: crackme.hexid.clone(),
                crackme_name: crackme.name.clone(),
                author: user.name.clone(),
                info: info.to_string(),
                filename,
            })
            .await
            .map_err(|e| match e {
                CoreError::Conflict(_) => CoreError::Conflict(DUPLICATE_SOLUTION.into()),
                other => other,
            })?;

        self.store_artifact(ContentKind::Solution, &solution.hexid, &path, &bytes)
            .await?;
        tracing::info!(
            hexid = %solution.hexid,
            crackme = %crackme.hexid,
            author = %user.name,
            bytes = bytes.len(),
            "Solution submitted"
        );

        self.notifier
            .dispatch(&ContentEvent::SolutionSubmitted {
                crackme_name: crackme.name,
                submitter: user.name,
            })
            .await;
        Ok(solution)
    }

    /// Upload a new crackme. It starts `Pending`.
    ///
    /// Name, language, architecture and platform are required.
    pub async fn submit_crackme<S, B, E>(
        &self,
        author: &str,
        details: &NewCrackme,
        upload: Upload<S>,
    ) -> Result<Crackme, CoreError>
    where
        S: Stream<Item = Result<B, E>> + Unpin + Send,
        B: AsRef<[u8]>,
        E: Display,
    {
        let declared = upload.check_size()?;
        let user = self.acting_user(author).await?;
        let name = validate_crackme_name(&details.name)?;
        let info = validate_crackme_info(&details.info)?;
        let lang = validate_label("Programming language", &details.lang)?;
        let arch = validate_label("Architecture", &details.arch)?;
        let platform = validate_label("Platform", &details.platform)?;

        let filename = sanitize_filename(&upload.filename)?;
        let hexid = hex_id::generate();
        let path = self.artifact_path(ContentKind::Crackme, &user.name, &hexid, &filename)?;
        let bytes = read_bounded(upload.body, declared).await?;

        let crackme = self
            .store
            .create_crackme(&CreateCrackme {
                hexid,
                name: name.to_string(),
                author: user.name.clone(),
                info: info.to_string(),
                lang: lang.to_string(),
                arch: arch.to_string(),
                platform: platform.to_string(),
                filename,
            })
            .await?;

        self.store_artifact(ContentKind::Crackme, &crackme.hexid, &path, &bytes)
            .await?;
        tracing::info!(
            hexid = %crackme.hexid,
            author = %user.name,
            bytes = bytes.len(),
            "Crackme submitted"
        );

        self.notifier
            .dispatch(&ContentEvent::CrackmeSubmitted {
                crackme_name: crackme.name.clone(),
                author: user.name,
            })
            .await;
        Ok(crackme)
    }

    /// A crackme that is publicly visible. Pending crackmes are reported as
    /// not found.
    pub(crate) async fn visible_crackme(&self, hexid: &str) -> Result<Crackme, CoreError> {
        let crackme = self.store.find_crackme_by_hexid(hexid).await?;
        if crackme.visibility() != Visibility::Visible {
            return Err(CoreError::not_found("Crackme", hexid));
        }
        Ok(crackme)
    }

    /// Storage path for an artifact of `kind`, rejected if it would leave
    /// the storage root.
    pub(crate) fn artifact_path(
        &self,
        kind: ContentKind,
        author: &str,
        hexid: &str,
        filename: &str,
    ) -> Result<PathBuf, CoreError> {
        let root = self.storage.root_for(kind)?;
        resolve_artifact_path(root, author, hexid, filename).inspect_err(|e| {
            tracing::error!(
                error = %e,
                kind = kind.name(),
                author = %author,
                filename = %filename,
                "Rejected unsafe artifact path"
            );
        })
    }

    /// Write the artifact after its record exists. A failed write leaves an
    /// orphan record behind; it is logged, not rolled back.
    async fn store_artifact(
        &self,
        kind: ContentKind,
        hexid: &str,
        path: &Path,
        bytes: &[u8],
    ) -> Result<(), CoreError> {
        write_artifact(path, bytes).await.map_err(|e| {
            tracing::error!(
                error = %e,
                kind = kind.name(),
                hexid = %hexid,
                path = %path.display(),
                "Artifact write failed, record left without file"
            );
            CoreError::Internal("Failed to store uploaded file".into())
        })
    }
}
