//! Route definitions for moderation decisions.
//!
//! Every endpoint requires the `x-moderation-token` header.

use axum::routing::{delete, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use super::JSON_BODY_LIMIT;
use crate::handlers::moderation;
use crate::state::AppState;

/// Routes mounted at `/moderation`.
///
/// ```text
/// POST   /{kind}/{hexid}/approve   -> approve   (crackme | solution)
/// POST   /{kind}/{hexid}/reject    -> reject    (crackme | solution)
/// DELETE /{kind}/{hexid}           -> delete    (crackme | solution | comment)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}/{hexid}/approve", post(moderation::approve))
        .route(
            "/{kind}/{hexid}/reject",
            post(moderation::reject).layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT)),
        )
        .route("/{kind}/{hexid}", delete(moderation::delete))
}
