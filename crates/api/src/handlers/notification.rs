//! Handlers for the `/notifications` resource.
//!
//! Every endpoint is scoped to the caller from [`ActingUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use crackmes_db::models::notification::Notification;

use crate::error::AppResult;
use crate::middleware::identity::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Newest first.
pub async fn list_notifications(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = state.content.notifications(&user).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/v1/notifications/unseen-count
pub async fn unseen_count(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.content.unseen_notification_count(&user).await?;
    Ok(Json(serde_json::json!({ "data": { "unseen": count } })))
}

/// POST /api/v1/notifications/seen
pub async fn mark_seen(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.content.mark_notifications_seen(&user).await?;
    Ok(Json(serde_json::json!({ "data": { "marked_seen": count } })))
}

/// DELETE /api/v1/notifications/{hexid}
///
/// 204 on success, 404 if the notification does not belong to the caller.
pub async fn delete_notification(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
    Path(hexid): Path<String>,
) -> AppResult<StatusCode> {
    state.content.delete_notification(&user, &hexid).await?;
    Ok(StatusCode::NO_CONTENT)
}
