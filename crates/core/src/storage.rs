//! Secure artifact storage paths and upload limits.
//!
//! Uploaded crackme and solution binaries are stored flat, one file per
//! record, under a per-kind storage root:
//!
//! ```text
//! {storage_root}/{author}+++{hexid}+++{sanitized_filename}
//! ```
//!
//! The file naming format is persisted and parsed back by moderation
//! tooling; it must not change without a migration.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;
use crate::hex_id;
use crate::visibility::ContentKind;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size in bytes, checked against the declared
/// length before any of the payload is read.
pub const MAX_UPLOAD_BYTES: u64 = 5_000_000;

/// Separator between the three parts of a stored file name.
pub const NAME_SEPARATOR: &str = "+++";

/// Longest sanitized file name we accept.
pub const MAX_FILENAME_LEN: usize = 128;

/// Default crackme storage root (relative to the working directory).
pub const DEFAULT_CRACKME_STORAGE_PATH: &str = "tmp/crackme";

/// Default solution storage root (relative to the working directory).
pub const DEFAULT_SOLUTION_STORAGE_PATH: &str = "tmp/solution";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Storage roots for uploaded artifacts.
///
/// Loaded once at process start; call [`StorageConfig::resolve`] before use
/// so both roots exist and are absolute.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub crackme_root: PathBuf,
    pub solution_root: PathBuf,
}

impl StorageConfig {
    /// Load storage roots from environment variables with defaults.
    ///
    /// | Env Var                 | Default        |
    /// |-------------------------|----------------|
    /// | `CRACKME_STORAGE_PATH`  | `tmp/crackme`  |
    /// | `SOLUTION_STORAGE_PATH` | `tmp/solution` |
    pub fn from_env() -> Self {
        Self {
            crackme_root: env_path("CRACKME_STORAGE_PATH", DEFAULT_CRACKME_STORAGE_PATH),
            solution_root: env_path("SOLUTION_STORAGE_PATH", DEFAULT_SOLUTION_STORAGE_PATH),
        }
    }

    /// Create both roots if missing and replace them with their canonical
    /// absolute form.
    pub fn resolve(self) -> std::io::Result<Self> {
        std::fs::create_dir_all(&self.crackme_root)?;
        std::fs::create_dir_all(&self.solution_root)?;
        Ok(Self {
            crackme_root: std::fs::canonicalize(&self.crackme_root)?,
            solution_root: std::fs::canonicalize(&self.solution_root)?,
        })
    }

    /// Storage root for artifacts of `kind`. Comments carry no artifact.
    pub fn root_for(&self, kind: ContentKind) -> Result<&Path, CoreError> {
        match kind {
            ContentKind::Crackme => Ok(&self.crackme_root),
            ContentKind::Solution => Ok(&self.solution_root),
            ContentKind::Comment => Err(CoreError::Validation(
                "Comments have no stored artifact".into(),
            )),
        }
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .into()
}

// ---------------------------------------------------------------------------
// Size guard
// ---------------------------------------------------------------------------

/// Check the declared upload length against [`MAX_UPLOAD_BYTES`].
///
/// Must run before the payload is read into memory. Returns the accepted
/// length.
pub fn check_declared_size(declared: Option<u64>) -> Result<u64, CoreError> {
    match declared {
        None => Err(CoreError::Validation(
            "Upload must declare its content length".into(),
        )),
        Some(0) => Err(CoreError::Validation("Field missing: file".into())),
        Some(len) if len > MAX_UPLOAD_BYTES => Err(CoreError::Validation(format!(
            "This file is too large: {len} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit"
        ))),
        Some(len) => Ok(len),
    }
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

/// Reduce a client-supplied file name to a safe base name.
///
/// Directory components (either separator) are stripped, every character
/// outside `[A-Za-z0-9._-]` is removed and leading dots are dropped.
pub fn sanitize_filename(raw: &str) -> Result<String, CoreError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return Err(CoreError::Validation(format!("Invalid file name '{raw}'")));
    }
    if cleaned.len() > MAX_FILENAME_LEN {
        return Err(CoreError::Validation(format!(
            "File name longer than {MAX_FILENAME_LEN} characters"
        )));
    }
    Ok(cleaned.to_string())
}

/// Build the stored file name from already-validated parts.
pub fn artifact_file_name(author: &str, hexid: &str, sanitized_filename: &str) -> String {
    format!("{author}{NAME_SEPARATOR}{hexid}{NAME_SEPARATOR}{sanitized_filename}")
}

/// The three parts of a stored file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName<'a> {
    pub author: &'a str,
    pub hexid: &'a str,
    pub filename: &'a str,
}

/// Split a stored file name back into its parts.
pub fn parse_artifact_file_name(name: &str) -> Option<ArtifactName<'_>> {
    let mut parts = name.splitn(3, NAME_SEPARATOR);
    let author = parts.next().filter(|s| !s.is_empty())?;
    let hexid = parts.next().filter(|s| hex_id::is_valid(s))?;
    let filename = parts.next().filter(|s| !s.is_empty())?;
    Some(ArtifactName {
        author,
        hexid,
        filename,
    })
}

// ---------------------------------------------------------------------------
// Path construction
// ---------------------------------------------------------------------------

/// Derive the storage path for an artifact and prove it stays inside `root`.
///
/// `root` must be absolute (see [`StorageConfig::resolve`]). The joined path
/// is normalized lexically and must sit directly inside the normalized
/// root; any violation is an error, never silently corrected.
pub fn resolve_artifact_path(
    root: &Path,
    author: &str,
    hexid: &str,
    raw_filename: &str,
) -> Result<PathBuf, CoreError> {
    if !root.is_absolute() {
        return Err(CoreError::Internal(format!(
            "Storage root {} is not absolute",
            root.display()
        )));
    }
    hex_id::validate(hexid)?;
    if author.is_empty() || author.contains(NAME_SEPARATOR) {
        return Err(CoreError::Validation(format!(
            "Author name '{author}' cannot be used in a file name"
        )));
    }

    let filename = sanitize_filename(raw_filename)?;
    let root = normalize(root);
    let candidate = normalize(&root.join(artifact_file_name(author, hexid, &filename)));

    if candidate == root || !candidate.starts_with(&root) || candidate.parent() != Some(&*root) {
        return Err(CoreError::Validation("Invalid file path".into()));
    }
    Ok(candidate)
}

/// Lexically normalize a path: drop `.` and resolve `..` against preceding
/// components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
