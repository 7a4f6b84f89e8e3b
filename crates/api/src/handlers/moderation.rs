//! Handlers for moderation decisions. All require [`Moderator`].

use axum::extract::{Path, State};
use axum::Json;
use crackmes_content::Moderated;
use crackmes_core::visibility::ContentKind;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::moderation::Moderator;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /moderation/{kind}/{hexid}/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// POST /api/v1/moderation/{kind}/{hexid}/approve
pub async fn approve(
    _: Moderator,
    State(state): State<AppState>,
    Path((kind, hexid)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Moderated>>> {
    let kind = ContentKind::from_name(&kind)?;
    let outcome = state.content.approve(kind, &hexid).await?;
    Ok(Json(DataResponse::new(outcome)))
}

/// POST /api/v1/moderation/{kind}/{hexid}/reject
pub async fn reject(
    _: Moderator,
    State(state): State<AppState>,
    Path((kind, hexid)): Path<(String, String)>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<Moderated>>> {
    let kind = ContentKind::from_name(&kind)?;
    let outcome = state
        .content
        .reject(kind, &hexid, input.reason.as_deref())
        .await?;
    Ok(Json(DataResponse::new(outcome)))
}

/// DELETE /api/v1/moderation/{kind}/{hexid}
pub async fn delete(
    _: Moderator,
    State(state): State<AppState>,
    Path((kind, hexid)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Moderated>>> {
    let kind = ContentKind::from_name(&kind)?;
    let outcome = state.content.delete(kind, &hexid).await?;
    Ok(Json(DataResponse::new(outcome)))
}
