//! Difficulty and quality ratings.
//!
//! A rating is stored first; the crackme's cached average is refreshed
//! afterwards. A failed refresh is logged and left for the repair task,
//! the same way a failed counter increment is.

use crackmes_core::error::CoreError;
use crackmes_core::rating::{validate_rating, RatingKind};
use crackmes_db::models::rating::{CreateRating, Rating, RatingSummary};
use crackmes_db::store::{CrackmeStore, RatingStore};
use serde::Serialize;

use crate::ContentService;

/// A stored rating and, when the refresh succeeded, the new average.
#[derive(Debug, Clone, Serialize)]
pub struct Rated {
    pub rating: Rating,
    pub summary: Option<RatingSummary>,
}

fn already_rated(kind: RatingKind) -> CoreError {
    CoreError::Conflict(format!(
        "You have already rated the {} of this crackme",
        kind.name()
    ))
}

impl ContentService {
    /// Rate a visible crackme from 1 to 5. Each user rates each kind once.
    pub async fn rate(
        &self,
        author: &str,
        crackme_hexid: &str,
        kind: RatingKind,
        value: i32,
    ) -> Result<Rated, CoreError> {
        let user = self.acting_user(author).await?;
        let value = validate_rating(value)?;
        let crackme = self.visible_crackme(crackme_hexid).await?;

        if self
            .store
            .has_rating(kind, &user.name, &crackme.hexid)
            .await?
        {
            return Err(already_rated(kind));
        }

        let rating = self
            .store
            .create_rating(&CreateRating {
                kind,
                author: user.name.clone(),
                crackme_hexid: crackme.hexid.clone(),
                rating: value,
            })
            .await
            .map_err(|e| match e {
                CoreError::Conflict(_) => already_rated(kind),
                other => other,
            })?;
        tracing::info!(
            crackme = %crackme.hexid,
            author = %user.name,
            kind = kind.name(),
            rating = value,
            "Crackme rated"
        );

        let summary = self.refresh_rating(kind, &crackme.hexid).await;
        Ok(Rated { rating, summary })
    }

    /// Recompute one cached average and write it back. Failures are logged.
    async fn refresh_rating(&self, kind: RatingKind, crackme_hexid: &str) -> Option<RatingSummary> {
        let result = async {
            let summary = self.store.rating_summary(kind, crackme_hexid).await?;
            self.store
                .set_crackme_rating(crackme_hexid, kind, summary.average)
                .await?;
            Ok::<_, CoreError>(summary)
        }
        .await;

        match result {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    crackme = %crackme_hexid,
                    kind = kind.name(),
                    "Rating average refresh failed, left for reconciliation"
                );
                None
            }
        }
    }
}
