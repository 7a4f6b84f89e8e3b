use axum::extract::{Path, State};
use axum::Json;
use crackmes_content::{SiteStats, UserProfile};
use crackmes_db::models::user::User;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = state.content.list_users().await?;
    Ok(Json(DataResponse::new(users)))
}

/// GET /api/v1/users/{name}
///
/// The name must match exactly, case included.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = state.content.user_profile(&name).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<SiteStats>>> {
    let stats = state.content.stats().await?;
    Ok(Json(DataResponse::new(stats)))
}
