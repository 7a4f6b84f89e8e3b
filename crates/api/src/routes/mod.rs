pub mod crackme;
pub mod health;
pub mod moderation;
pub mod notification;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Ceiling for JSON request bodies. Uploads are bounded separately by the
/// declared-size guard.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                               visible users, profiles
/// /crackmes                            crackme pages, uploads, comments
/// /notifications                       caller's inbox
/// /stats                               site totals
/// /moderation                          approve / reject / delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user::router())
        .nest("/crackmes", crackme::router())
        .nest("/notifications", notification::router())
        .route("/stats", get(handlers::user::stats))
        .nest("/moderation", moderation::router())
}
