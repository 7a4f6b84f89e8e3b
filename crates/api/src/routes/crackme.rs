//! Route definitions for the `/crackmes` resource.

use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use super::JSON_BODY_LIMIT;
use crate::handlers::crackme;
use crate::state::AppState;

/// Routes mounted at `/crackmes`.
///
/// ```text
/// POST   /?name=&filename=&lang=&arch=&platform=&info=
///                                             -> upload_crackme (raw body)
/// GET    /{hexid}                             -> get_crackme
/// POST   /{hexid}/comments                    -> create_comment
/// POST   /{hexid}/ratings                     -> rate_crackme
/// POST   /{hexid}/solutions?filename=&info=   -> upload_solution (raw body)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(crackme::upload_crackme))
        .route("/{hexid}", get(crackme::get_crackme))
        .route(
            "/{hexid}/comments",
            post(crackme::create_comment).layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT)),
        )
        .route(
            "/{hexid}/ratings",
            post(crackme::rate_crackme).layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT)),
        )
        .route("/{hexid}/solutions", post(crackme::upload_solution))
}
