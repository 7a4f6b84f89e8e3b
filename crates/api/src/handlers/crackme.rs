//! Handlers for the `/crackmes` resource: crackme pages, crackme and
//! solution uploads, comments, ratings.
//!
//! Uploads are raw request bodies. The declared length comes from
//! `Content-Length` and is checked before the body is read.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use crackmes_content::{CrackmeDetail, NewCrackme, Rated, Upload};
use crackmes_core::rating::RatingKind;
use crackmes_db::models::comment::Comment;
use crackmes_db::models::crackme::Crackme;
use crackmes_db::models::solution::Solution;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::identity::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `POST /crackmes`.
#[derive(Debug, Deserialize)]
pub struct CrackmeUploadQuery {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub lang: Option<String>,
    pub arch: Option<String>,
    pub platform: Option<String>,
    pub info: Option<String>,
}

/// Query parameters for `POST /crackmes/{hexid}/solutions`.
#[derive(Debug, Deserialize)]
pub struct SolutionUploadQuery {
    pub filename: Option<String>,
    pub info: Option<String>,
}

/// Request body for `POST /crackmes/{hexid}/ratings`.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub kind: String,
    pub rating: i32,
}

/// Request body for `POST /crackmes/{hexid}/comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing query parameter '{field}'")))
}

/// Declared body length. A missing or unparseable header is left to the
/// size guard, which rejects it.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/crackmes/{hexid}
pub async fn get_crackme(
    State(state): State<AppState>,
    Path(hexid): Path<String>,
) -> AppResult<Json<DataResponse<CrackmeDetail>>> {
    let detail = state.content.crackme_detail(&hexid).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /api/v1/crackmes?name=&filename=&lang=&arch=&platform=&info=
///
/// The new crackme is pending until a moderator approves it. `info` is
/// optional.
pub async fn upload_crackme(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
    Query(params): Query<CrackmeUploadQuery>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<(StatusCode, Json<DataResponse<Crackme>>)> {
    let details = NewCrackme {
        name: required(params.name, "name")?,
        lang: required(params.lang, "lang")?,
        arch: required(params.arch, "arch")?,
        platform: required(params.platform, "platform")?,
        info: params.info.unwrap_or_default(),
    };
    let filename = required(params.filename, "filename")?;
    let upload = Upload::new(filename, declared_length(&headers), body.into_data_stream());

    let crackme = state.content.submit_crackme(&user, &details, upload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(crackme))))
}

/// POST /api/v1/crackmes/{hexid}/solutions?filename=&info=
///
/// Returns 409 when the caller already has a live solution for this crackme.
pub async fn upload_solution(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
    Path(hexid): Path<String>,
    Query(params): Query<SolutionUploadQuery>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<(StatusCode, Json<DataResponse<Solution>>)> {
    let info = required(params.info, "info")?;
    let filename = required(params.filename, "filename")?;
    let upload = Upload::new(filename, declared_length(&headers), body.into_data_stream());

    let solution = state
        .content
        .submit_solution(&user, &hexid, &info, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(solution))))
}

/// POST /api/v1/crackmes/{hexid}/comments
pub async fn create_comment(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
    Path(hexid): Path<String>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let comment = state
        .content
        .create_comment(&user, &hexid, &input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// POST /api/v1/crackmes/{hexid}/ratings
///
/// Returns 409 when the caller already rated this kind for the crackme.
pub async fn rate_crackme(
    ActingUser(user): ActingUser,
    State(state): State<AppState>,
    Path(hexid): Path<String>,
    Json(input): Json<RateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Rated>>)> {
    let kind = RatingKind::from_name(&input.kind)?;
    let rated = state
        .content
        .rate(&user, &hexid, kind, input.rating)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(rated))))
}
