//! Crackme entity model and DTOs.

use crackmes_core::rating::RatingKind;
use crackmes_core::types::{DbId, Timestamp};
use crackmes_core::visibility::Visibility;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `crackmes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Crackme {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub hexid: String,
    pub name: String,
    pub author: String,
    pub info: String,
    pub lang: String,
    pub arch: String,
    pub platform: String,
    /// Mean of the live difficulty ratings, `0` when unrated.
    pub difficulty: f64,
    /// Mean of the live quality ratings, `0` when unrated.
    pub quality: f64,
    /// Sanitized upload name; the stored file is
    /// `{author}+++{hexid}+++{filename}`.
    pub filename: String,
    pub visible: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub nb_solutions: i64,
    pub nb_comments: i64,
    pub created_at: Timestamp,
}

impl Crackme {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_flags(self.visible, self.deleted)
    }

    /// Cached average for `kind`.
    pub fn rating(&self, kind: RatingKind) -> f64 {
        match kind {
            RatingKind::Difficulty => self.difficulty,
            RatingKind::Quality => self.quality,
        }
    }
}

/// DTO for creating a new crackme. The hex id is assigned by the caller
/// before insert so the storage path can be checked first.
#[derive(Debug, Clone)]
pub struct CreateCrackme {
    pub hexid: String,
    pub name: String,
    pub author: String,
    pub info: String,
    pub lang: String,
    pub arch: String,
    pub platform: String,
    pub filename: String,
}
