//! Route definitions for the `/notifications` resource.
//!
//! All endpoints act on the caller's own inbox.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                -> list_notifications
/// GET    /unseen-count    -> unseen_count
/// POST   /seen            -> mark_seen
/// DELETE /{hexid}         -> delete_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/unseen-count", get(notification::unseen_count))
        .route("/seen", post(notification::mark_seen))
        .route("/{hexid}", delete(notification::delete_notification))
}
